//! Color key, day selection and day-paint store.
//!
//! # Responsibility
//! - Own the color palette, the active paint color and per-month day colors.
//! - Track pending day selections and commit them as painted days.
//! - Mirror the day-color map to durable storage when one is attached.
//!
//! # Invariants
//! - The palette is append-only and starts with the presets.
//! - `update_day_colors` merges per day; it never drops days it was not given.
//! - A committed paint clears the month's selection, the pending month and
//!   the active color.
//! - Persistence is write-behind: mutations never wait on the backend, and
//!   failures are logged without changing in-memory state.

use crate::model::color::{
    days_in_month, month_index, preset_colors, ColorDefinition, DayColorMap, MonthDayColors,
};
use crate::storage::{KeyValueStorage, StorageError, StorageResult, WriteBehind};
use crate::store::rejection::{Rejection, StoreResult};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Fixed storage key holding the serialized day-color map.
pub const DAY_COLORS_STORAGE_KEY: &str = "dayColorsMap";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DaySelection {
    days: Vec<u32>,
    anchor: Option<u32>,
}

/// In-memory color state with optional durable mirroring.
pub struct ColorStore {
    palette: Vec<ColorDefinition>,
    day_colors: DayColorMap,
    active_color: Option<String>,
    apply_color_to_month: Option<String>,
    selections: BTreeMap<String, DaySelection>,
    writer: Option<WriteBehind>,
}

impl Default for ColorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ColorStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorStore")
            .field("palette", &self.palette)
            .field("day_colors", &self.day_colors)
            .field("active_color", &self.active_color)
            .field("apply_color_to_month", &self.apply_color_to_month)
            .field("selections", &self.selections)
            .field("persistent", &self.writer.is_some())
            .finish()
    }
}

impl ColorStore {
    /// Creates a store with the preset palette and no painted days.
    pub fn new() -> Self {
        Self::with_day_colors(DayColorMap::new())
    }

    /// Creates a store from caller-provided painted days.
    pub fn with_day_colors(day_colors: DayColorMap) -> Self {
        Self {
            palette: preset_colors(),
            day_colors,
            active_color: None,
            apply_color_to_month: None,
            selections: BTreeMap::new(),
            writer: None,
        }
    }

    /// Restores painted days from `storage` and keeps mirroring to it.
    ///
    /// A missing entry starts empty; an unreadable entry is logged and also
    /// starts empty. Later writes go through a background writer thread.
    pub fn restore(storage: Box<dyn KeyValueStorage>) -> Self {
        let day_colors = match load_day_colors(storage.as_ref()) {
            Ok(Some(map)) => {
                info!(
                    "event=day_colors_load module=colors status=ok months={}",
                    map.len()
                );
                map
            }
            Ok(None) => {
                debug!("event=day_colors_load module=colors status=empty");
                DayColorMap::new()
            }
            Err(err) => {
                warn!(
                    "event=day_colors_load module=colors status=error error={}",
                    err
                );
                DayColorMap::new()
            }
        };

        let mut store = Self::with_day_colors(day_colors);
        match WriteBehind::spawn(storage) {
            Ok(writer) => store.writer = Some(writer),
            Err(err) => warn!(
                "event=day_colors_writer module=colors status=error error={}",
                err
            ),
        }
        store
    }

    /// Waits until every queued day-color write reached the backend.
    ///
    /// Mutations never call this; it exists for shutdown paths and tests.
    pub fn flush_persistence(&self) -> StorageResult<()> {
        match &self.writer {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Palette entries in display order.
    pub fn palette(&self) -> &[ColorDefinition] {
        &self.palette
    }

    /// Appends a palette entry; duplicates are allowed.
    pub fn add_color(&mut self, definition: ColorDefinition) -> StoreResult<()> {
        let color = definition.color.trim();
        if color.is_empty() {
            return Err(reject("color_add", Rejection::BlankColor));
        }
        let definition = ColorDefinition::new(definition.name.trim(), color);
        self.palette.push(definition);
        debug!(
            "event=color_add module=colors status=ok palette_len={}",
            self.palette.len()
        );
        Ok(())
    }

    pub fn active_color(&self) -> Option<&str> {
        self.active_color.as_deref()
    }

    /// Selects the paint color; `None` or a blank token clears it.
    ///
    /// Selecting a color while some month already has selected days arms
    /// the first such month (calendar order) for painting.
    pub fn set_active_color(&mut self, color: Option<&str>) {
        self.active_color = color
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        if self.active_color.is_some() && self.apply_color_to_month.is_none() {
            self.apply_color_to_month = self.first_month_with_selection();
        }
    }

    /// Clears the paint color.
    pub fn reset_active_color(&mut self) {
        self.active_color = None;
    }

    /// Selects `color`, or clears it when it is already the active one.
    ///
    /// Returns the active color after the toggle.
    pub fn toggle_active_color(&mut self, color: &str) -> Option<&str> {
        if self.active_color.as_deref() == Some(color.trim()) {
            self.reset_active_color();
        } else {
            self.set_active_color(Some(color));
        }
        self.active_color()
    }

    /// Month whose selection is waiting to be painted.
    pub fn apply_color_to_month(&self) -> Option<&str> {
        self.apply_color_to_month.as_deref()
    }

    pub fn set_apply_color_to_month(&mut self, month: Option<&str>) {
        self.apply_color_to_month = month.map(str::to_string);
    }

    /// Applies one day click in `month`.
    ///
    /// # Contract
    /// - Plain click on a selected day deselects it; on any other day the
    ///   selection becomes just that day.
    /// - Extended click with an anchor adds the whole anchor..day range.
    /// - Extended click without an anchor appends the day.
    /// - While a color is active, the month becomes the pending paint month.
    /// - Unknown months and days outside the month's grid are rejected.
    pub fn select_day(&mut self, month: &str, day: u32, extend: bool) -> StoreResult<()> {
        let month_length = days_in_month(month)
            .ok_or_else(|| reject("day_select", Rejection::UnknownMonth(month.to_string())))?;
        if day == 0 || day > month_length {
            return Err(reject("day_select", Rejection::InvalidDay(day)));
        }

        let selection = self.selections.entry(month.to_string()).or_default();
        match (extend, selection.anchor) {
            (true, Some(anchor)) => {
                for candidate in anchor.min(day)..=anchor.max(day) {
                    if !selection.days.contains(&candidate) {
                        selection.days.push(candidate);
                    }
                }
            }
            _ => {
                if let Some(position) = selection.days.iter().position(|value| *value == day) {
                    selection.days.remove(position);
                } else if extend {
                    selection.days.push(day);
                } else {
                    selection.days = vec![day];
                }
                selection.anchor = Some(day);
            }
        }

        let has_days = !selection.days.is_empty();
        if self.active_color.is_some() && has_days {
            self.apply_color_to_month = Some(month.to_string());
        }
        Ok(())
    }

    /// Selected days of `month` in selection order.
    pub fn selected_days(&self, month: &str) -> &[u32] {
        self.selections
            .get(month)
            .map(|selection| selection.days.as_slice())
            .unwrap_or(&[])
    }

    pub fn clear_selection(&mut self, month: &str) {
        self.selections.remove(month);
    }

    /// Paints the pending month's selection with the active color.
    ///
    /// Returns the number of painted days.
    pub fn commit_paint(&mut self) -> StoreResult<usize> {
        let color = self
            .active_color
            .clone()
            .ok_or_else(|| reject("paint_commit", Rejection::NoActiveColor))?;
        let month = self
            .apply_color_to_month
            .clone()
            .ok_or_else(|| reject("paint_commit", Rejection::NoPendingMonth))?;
        let days = self.selected_days(&month).to_vec();
        if days.is_empty() {
            return Err(reject("paint_commit", Rejection::EmptySelection(month)));
        }

        let partial = days
            .iter()
            .map(|day| (*day, color.clone()))
            .collect::<MonthDayColors>();
        self.update_day_colors(&month, partial);

        self.selections.remove(&month);
        self.apply_color_to_month = None;
        self.active_color = None;
        info!(
            "event=paint_commit module=colors status=ok month={} days={}",
            month,
            days.len()
        );
        Ok(days.len())
    }

    /// Merges `partial` into the month's painted days.
    pub fn update_day_colors(&mut self, month: &str, partial: MonthDayColors) {
        if partial.is_empty() {
            return;
        }
        self.day_colors
            .entry(month.to_string())
            .or_default()
            .extend(partial);
        self.persist();
    }

    /// Snapshot of one month's painted days (empty for unknown months).
    pub fn day_colors_for_month(&self, month: &str) -> MonthDayColors {
        self.day_colors.get(month).cloned().unwrap_or_default()
    }

    /// Read-only view of every painted month.
    pub fn day_colors(&self) -> &DayColorMap {
        &self.day_colors
    }

    fn first_month_with_selection(&self) -> Option<String> {
        self.selections
            .iter()
            .filter(|(_, selection)| !selection.days.is_empty())
            .min_by_key(|(month, _)| month_index(month).unwrap_or(usize::MAX))
            .map(|(month, _)| month.clone())
    }

    fn persist(&self) {
        let Some(writer) = self.writer.as_ref() else {
            return;
        };
        if self.day_colors.is_empty() {
            return;
        }

        let result = serde_json::to_string(&self.day_colors)
            .map_err(StorageError::from)
            .and_then(|json| writer.put(DAY_COLORS_STORAGE_KEY, json));
        match result {
            Ok(()) => debug!(
                "event=day_colors_save module=colors status=queued months={}",
                self.day_colors.len()
            ),
            Err(err) => warn!(
                "event=day_colors_save module=colors status=error error={}",
                err
            ),
        }
    }
}

fn load_day_colors(storage: &dyn KeyValueStorage) -> StorageResult<Option<DayColorMap>> {
    match storage.get(DAY_COLORS_STORAGE_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn reject(event: &str, rejection: Rejection) -> Rejection {
    debug!(
        "event={} module=colors status=rejected reason={}",
        event,
        rejection.code()
    );
    rejection
}
