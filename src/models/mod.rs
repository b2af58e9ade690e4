pub use contact::*;
pub use event::*;
pub use nullable::*;
pub use photo::*;
pub use profile::*;
pub use session::*;
pub use show::*;
pub use show_type::*;

mod contact;
mod event;
mod nullable;
mod photo;
mod profile;
mod session;
mod show;
mod show_type;
