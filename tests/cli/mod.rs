pub mod support;

mod bundle;
mod evaluate;
mod list;
mod runs;
mod show;
mod summary;
mod watch;
