pub mod serve;

pub use serve::{run_init_db, run_serve, DbArgs, InitDbArgs, ServeArgs};
