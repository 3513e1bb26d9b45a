//! Guest-to-authenticated draft handoff.
//!
//! When a guest reaches the end of scheduling, the draft is snapshotted
//! into local persistence and the wizard suspends. After a session
//! appears, the snapshot is replayed exactly once: `try_resume_draft`
//! clears the stored copy no matter how the resume goes, so a
//! double-invoke can never duplicate a draft or replay a stale one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::addon::AddonCatalogEntry;
use crate::domain::draft::BookingDraft;
use crate::domain::service::{PropertySize, ServiceCatalogEntry, ServiceCategory};
use crate::wizard::Step;

/// Namespace key under which the snapshot is stored.
pub const DRAFT_SNAPSHOT_KEY: &str = "tidybook.guest-draft.v1";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("draft store failure: {0}")]
pub struct DraftStoreError(pub String);

/// Local key-value persistence for the guest draft. Synchronous on
/// purpose: the store is browser-local-storage shaped, not a network
/// hop.
pub trait LocalDraftStore: Send + Sync {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftStoreError>;
    fn load(&self) -> Result<Option<DraftSnapshot>, DraftStoreError>;
    fn clear(&self) -> Result<(), DraftStoreError>;
}

/// Serialized form of an in-progress draft. Catalog references are
/// stored as bare ids and re-resolved against the live catalog on
/// resume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub category: Option<ServiceCategory>,
    pub service_id: Option<i64>,
    pub property_size: Option<PropertySize>,
    pub crew_size: Option<u8>,
    pub duration_hours: Option<Decimal>,
    pub uses_own_materials: bool,
    pub window_panel_count: Option<u32>,
    pub addon_ids: Vec<i64>,
    pub step: u8,
}

pub fn snapshot_of(draft: &BookingDraft, step: Step) -> DraftSnapshot {
    DraftSnapshot {
        category: draft.category,
        service_id: draft.service.as_ref().map(|service| service.id.0),
        property_size: draft.property_size,
        crew_size: draft.crew_size,
        duration_hours: draft.duration_hours,
        uses_own_materials: draft.uses_own_materials,
        window_panel_count: draft.window_panel_count,
        addon_ids: draft.selected_addons.iter().map(|addon| addon.id.0).collect(),
        step: step.number(),
    }
}

pub fn persist_draft(
    store: &dyn LocalDraftStore,
    draft: &BookingDraft,
    step: Step,
) -> Result<(), DraftStoreError> {
    let snapshot = snapshot_of(draft, step);
    store.save(&snapshot)?;
    tracing::info!(step = snapshot.step, "guest draft persisted");
    Ok(())
}

/// One-shot resume. Returns the rebuilt draft and the step to reopen at,
/// or `None` when there is nothing (or nothing usable) to resume.
///
/// Soft-failure policy: catalog ids that no longer resolve are dropped,
/// a corrupt snapshot resumes as nothing, and the stored copy is cleared
/// unconditionally so the wizard can always open fresh.
pub fn try_resume_draft(
    store: &dyn LocalDraftStore,
    services: &[ServiceCatalogEntry],
    addons: &[AddonCatalogEntry],
) -> Option<(BookingDraft, Step)> {
    let loaded = store.load();
    if let Err(error) = store.clear() {
        tracing::warn!(%error, "failed to clear guest draft snapshot");
    }

    let snapshot = match loaded {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return None,
        Err(error) => {
            tracing::warn!(%error, "guest draft snapshot unreadable; opening fresh");
            return None;
        }
    };

    let service =
        snapshot.service_id.and_then(|id| services.iter().find(|s| s.id.0 == id)).cloned();
    let service_resolved = service.is_some();
    if snapshot.service_id.is_some() && !service_resolved {
        tracing::warn!(service_id = ?snapshot.service_id, "snapshot service no longer resolves");
    }

    let selected_addons: Vec<AddonCatalogEntry> = snapshot
        .addon_ids
        .iter()
        .filter_map(|id| addons.iter().find(|a| a.id.0 == *id))
        .cloned()
        .collect();

    let draft = BookingDraft {
        category: snapshot.category,
        service,
        // Configuration derived from a dropped service is stale; the
        // forward guards would refuse it anyway.
        property_size: snapshot.property_size.filter(|_| service_resolved),
        crew_size: snapshot.crew_size.filter(|_| service_resolved),
        duration_hours: snapshot.duration_hours.filter(|_| service_resolved),
        uses_own_materials: snapshot.uses_own_materials,
        window_panel_count: snapshot.window_panel_count.filter(|_| service_resolved),
        selected_addons,
        ..BookingDraft::default()
    };

    // Scheduling is always redone after the authentication detour.
    let step = Step::from_number(snapshot.step)
        .unwrap_or(Step::CategorySelection)
        .min(Step::Scheduling);

    tracing::info!(step = step.number(), "guest draft resumed");
    Some((draft, step))
}
