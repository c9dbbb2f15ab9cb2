pub mod actions;
pub mod cards;
pub mod choreography;
pub mod element;
pub mod flash;
pub mod hand;
pub mod players;
pub mod tray;
pub mod view;
