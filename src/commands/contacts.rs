//! Contact Commands
//!
//! Commands for choosing tracked contacts, assigning waves and ranking.

use heatwave_core::{DirectoryId, Timestamp};

use crate::commands::waves::require_wave;
use crate::models::contact::Contact;
use crate::models::response::{CommandResponse, RefreshReport};
use crate::services::ranking::{rank_contacts, RankedContact};
use crate::services::selection::{
    apply_selection, selectable_contacts, SelectableContact, SelectionOutcome,
};
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Directory entries that can be tracked, optionally filtered by name prefix
pub fn browse_contacts(
    state: &AppState,
    name_prefix: Option<&str>,
) -> CommandResponse<Vec<SelectableContact>> {
    selectable_contacts(
        state.sources().directory.as_ref(),
        state.store(),
        name_prefix,
    )
    .into()
}

/// Track `actives` and untrack `inactives`
pub fn update_selection(
    state: &AppState,
    actives: &[DirectoryId],
    inactives: &[DirectoryId],
) -> CommandResponse<SelectionOutcome> {
    CommandResponse::ok(apply_selection(state.store(), actives, inactives))
}

/// Put a contact on the named wave, or take it off any wave with `None`
pub fn assign_contact(
    state: &AppState,
    directory_id: DirectoryId,
    wave_name: Option<&str>,
) -> CommandResponse<Contact> {
    let result: AppResult<Contact> = (|| {
        let wave_id = match wave_name {
            Some(name) => require_wave(state, name)?.id(),
            None => None,
        };
        state.store().assign_wave(directory_id, wave_id)
    })();
    result.into()
}

/// Rank tracked contacts, most overdue first.
///
/// `refresh` overrides the `refresh_on_rank` setting when given.
pub fn ranked_contacts(
    state: &AppState,
    now: Timestamp,
    refresh: Option<bool>,
) -> CommandResponse<Vec<RankedContact>> {
    let refresh = refresh.unwrap_or(state.config().refresh_on_rank);
    rank_contacts(
        state.store(),
        state.sources().directory.as_ref(),
        now,
        refresh,
    )
    .into()
}

/// Refresh the cached last contact time of every tracked contact
pub fn refresh_contacts(state: &AppState) -> CommandResponse<Vec<RefreshReport>> {
    let result = state.store().refresh_all().map(|results| {
        results
            .into_iter()
            .map(|(directory_id, result)| match result {
                Ok(last_contact) => RefreshReport {
                    directory_id,
                    last_contact,
                    error: None,
                },
                Err(e) => RefreshReport {
                    directory_id,
                    last_contact: None,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    });
    result.into()
}

/// Number to call for a contact
pub fn dial_contact(state: &AppState, directory_id: DirectoryId) -> CommandResponse<String> {
    state.store().dial_number(directory_id).into()
}
