//! Descriptor factories, one module per resource family
//!
//! Every factory fixes the endpoint, the transform and the merge policy per
//! table, so call sites never choose how a response lands in the store.

mod favorites;
mod interactions;
mod lists;
mod relations;
mod resource;
mod user_lists;

pub use favorites::{favorite_mutation, favorites_request};
pub use interactions::log_interaction_mutation;
pub use lists::{
    all_podcasts, featured_courses, new_courses, new_videos, podcast_episodes, recent_podcast_episodes,
    upcoming_courses, ListDefinition,
};
pub use relations::{popular_content_request, similar_resources_request};
pub use resource::{resource_request, resource_url};
pub use user_lists::{
    create_list_item_mutation, create_user_list_mutation, delete_list_item_mutation,
    delete_user_list_mutation, update_user_list_mutation, user_list_items_request, user_lists_request,
};
