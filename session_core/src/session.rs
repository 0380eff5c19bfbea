//! The outer session loop: drives a host-supplied step function and makes
//! sure the game is saved on the way out, however that happens.

use anyhow::Context;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use game_rules::colors;

use crate::engine::Engine;

/// What the host wants after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Save, then stop.
    Quit,
    /// Stop without touching the save file.
    QuitWithoutSaving,
}

/// Run `step` until it asks to stop.
///
/// If `step` fails or panics, the failure is written to the message log and
/// the trace, a best-effort save is attempted, and the failure is passed on.
pub fn run<F>(engine: &mut Engine, save_path: &Path, mut step: F) -> anyhow::Result<()>
where
    F: FnMut(&mut Engine) -> anyhow::Result<Control>,
{
    loop {
        match panic::catch_unwind(AssertUnwindSafe(|| step(engine))) {
            Ok(Ok(Control::Continue)) => {}
            Ok(Ok(Control::Quit)) => {
                engine
                    .save_as(save_path)
                    .with_context(|| format!("failed to save to {}", save_path.display()))?;
                return Ok(());
            }
            Ok(Ok(Control::QuitWithoutSaving)) => {
                tracing::info!("session ended without saving");
                return Ok(());
            }
            Ok(Err(err)) => {
                report_failure(engine, save_path, &format!("{err:#}"));
                return Err(err);
            }
            Err(payload) => {
                report_failure(engine, save_path, &panic_message(payload.as_ref()));
                panic::resume_unwind(payload);
            }
        }
    }
}

fn report_failure(engine: &mut Engine, save_path: &Path, message: &str) {
    tracing::error!(error = %message, "session step failed");
    engine.message_log.add_message(message, colors::ERROR);
    if let Err(err) = engine.save_as(save_path) {
        tracing::warn!(error = %err, path = %save_path.display(), "emergency save failed");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
