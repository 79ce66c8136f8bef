//! Expression calculator and task dashboard behind a presentation-agnostic
//! handler layer. The `pocket-desk` binary is a console front end.

pub mod commands;
pub mod composer;
pub mod config;
pub mod events;
pub mod expr;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod view;
pub mod widget;
