pub mod descriptor;
pub mod errors;
pub mod kind;
pub mod signature;
