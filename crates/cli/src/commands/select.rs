use std::error::Error;

use scout_apdu_core::prelude::*;
use tracing::{info, warn};

/// Select a DF by name before scanning under it
pub fn select_aid<E: Executor>(executor: &mut E, aid: &[u8]) -> Result<(), Box<dyn Error>> {
    let response = executor.select_df_by_name(aid.to_vec(), 0x00)?;
    let status = response.status();

    if !response.is_success() {
        warn!(aid = %hex::encode_upper(aid), %status, "SELECT by name failed");
        return Err(format!(
            "SELECT {} failed with status {status} ({})",
            hex::encode_upper(aid),
            status.category()
        )
        .into());
    }

    info!(aid = %hex::encode_upper(aid), "DF selected");
    Ok(())
}
