mod pagination;
mod post;
mod user;

pub use pagination::{PageQuery, Pagination};
pub use post::{Comment, Like, NewPost, Post, PostChanges, PostWithRelations};
pub use user::{NewUser, User, UserChanges};
