mod core;
mod dump;

pub use self::core::SessionController;
