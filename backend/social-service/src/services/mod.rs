/// Business logic layer
pub mod auth;
pub mod posts;
pub mod uploads;
pub mod users;

pub use auth::{AuthService, LoginIdentifier};
pub use posts::{LikeState, PostService};
pub use uploads::ImageStore;
pub use users::{FollowPage, UserService};
