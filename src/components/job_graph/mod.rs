//! Company, job and skill graphs: build, lay out, draw and interact.

mod builder;
mod canvas;
mod component;
mod config;
mod error;
mod gate;
mod hero;
mod interaction;
mod layout;
mod projection;
mod render;
mod scheduler;
#[cfg(test)]
mod testing;
mod types;
mod view;

pub use component::{JobGraphDisclosure, MiniJobGraph};
pub use hero::JobsGraphHero;
pub use types::{JobInput, JobRecord};
