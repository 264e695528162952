//! Text and JSON readouts of a run's states.

use std::path::Path;

use icp_math::IterationState;

/// Column header matching [`format_state_row`].
pub fn table_header() -> String {
    format!(
        "{:>5} {:>14} {:>14} {:>10} {:>10} {:>10}",
        "iter", "error", "prev_error", "rot_deg", "tx", "ty"
    )
}

/// One aligned table row per state.
pub fn format_state_row(state: &IterationState) -> String {
    let prev = state
        .prev_error
        .map(|e| format!("{e:.6}"))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:>5} {:>14.6} {:>14} {:>10.3} {:>10.3} {:>10.3}",
        state.iteration,
        state.error,
        prev,
        state.transformation.rotation_degrees(),
        state.transformation.translation.x,
        state.transformation.translation.y
    )
}

/// Serializes all states as pretty JSON for external renderers.
pub fn states_to_json(states: &[IterationState]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(states)
}

/// Writes [`states_to_json`] output to `path`.
pub fn write_states_json(path: &Path, states: &[IterationState]) -> std::io::Result<()> {
    let json = states_to_json(states)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}
