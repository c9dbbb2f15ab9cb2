//! Client-side reconciliation and interaction engine for runo.
//!
//! Polled snapshots from the rules service flow through [`app::Engine`],
//! which keeps the hand, the tray, and the scoreboard in step with the
//! server and decides when the player may act. [`runtime::Runtime`]
//! drives an engine on tokio against an [`gateway::ActionGateway`].

pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod polling;
pub mod runtime;
pub mod telemetry;
pub mod ui;


pub use app::Engine;
pub use config::{ClientConfig, GameContext};
pub use error::{GatewayError, ProtocolAnomaly};
pub use gateway::{Action, ActionGateway, HttpGateway, Lobby};
pub use messages::{Effect, Msg};
pub use runtime::{Frontend, Runtime};
pub use ui::view::{TableView, ViewChange, ViewKey};
