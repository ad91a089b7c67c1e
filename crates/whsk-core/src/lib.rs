//! Interaction logic of the WHSK swap page: wallet session, swap form,
//! operation log and configuration. Free of any browser dependency so it can
//! be driven by the wasm front end and by native tests alike.

pub mod config;
pub mod content;
pub mod notifier;
pub mod session;
pub mod swap;

pub use config::AppConfig;
pub use notifier::OperationLog;
pub use session::{Session, SessionError, SessionManager};
pub use swap::{Balances, SubmitButton, Submission, SwapError, SwapForm, fetch_balances};
