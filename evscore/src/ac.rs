pub mod action;
pub mod resource;
pub mod role;
pub mod traits;
pub mod user;

pub use self::action::Action;
pub use self::resource::Resource;
pub use self::role::Role;
