pub mod app;
pub mod board;
pub mod command;
pub mod components;
pub mod events;
pub mod filter_dialog;
pub mod gate;
pub mod keybindings;
pub mod prompt;
pub mod query;
pub mod router;
pub mod scroll;
pub mod theme;
pub mod ui;

pub use app::{App, AppOptions, GatewayFactory, Mode, Screen, Session, UrlOpener};
pub use router::{Route, RouteError, Router};
