pub mod enums;
pub mod contact;
pub mod hospital;
pub mod incident;
pub mod patient;

pub use contact::*;
pub use hospital::*;
pub use incident::*;
pub use patient::*;
