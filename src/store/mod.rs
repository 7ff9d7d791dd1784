//! Persistence Layer
//! Mission: SQLite-backed stores for accounts, posts and comments

pub mod comments;
pub mod posts;
pub mod users;

pub use comments::CommentStore;
pub use posts::PostStore;
pub use users::UserStore;
