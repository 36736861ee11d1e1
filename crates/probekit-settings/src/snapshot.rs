//! Settings snapshots
//!
//! A [`SettingsSnapshot`] is the flat, serializable copy of every probe
//! parameter plus the selected units, work coordinate system and mode. It is
//! what gets persisted between sessions, as JSON inside the settings record.
//!
//! Every entry is optional on the way in: a payload written by an older
//! version may lack fields, and those keep their current values on restore.
//! Anything present must be valid, otherwise the whole snapshot is rejected.

use probekit_core::{Units, WorkCoordinateSystem};
use probekit_probe::{FieldKey, Mode, ModeSelector, ParameterModel, ParameterValues};
use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};

macro_rules! snapshot_fields {
    ($($key:ident => $field:ident),* $(,)?) => {
        /// Persisted probe settings
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct SettingsSnapshot {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<f64>,
            )*
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub settings_work_coordinate_idx: Option<usize>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub settings_units_idx: Option<usize>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub selected_tab_idx: Option<usize>,
        }

        impl SettingsSnapshot {
            /// Stored value of a field, if present
            pub fn field(&self, key: FieldKey) -> Option<f64> {
                match key {
                    $(FieldKey::$key => self.$field,)*
                }
            }

            fn field_mut(&mut self, key: FieldKey) -> &mut Option<f64> {
                match key {
                    $(FieldKey::$key => &mut self.$field,)*
                }
            }
        }
    };
}

snapshot_fields! {
    XyzXDistance => xyz_x_distance,
    XyzYDistance => xyz_y_distance,
    XyzZDistance => xyz_z_distance,
    XyzXOffset => xyz_x_offset,
    XyzYOffset => xyz_y_offset,
    XyzZOffset => xyz_z_offset,
    OutsideXDistance => outside_x_distance,
    OutsideYDistance => outside_y_distance,
    OutsideXOffset => outside_x_offset,
    OutsideYOffset => outside_y_offset,
    ZDistance => z_distance,
    ZOffset => z_offset,
    InsideXDistance => inside_x_distance,
    InsideYDistance => inside_y_distance,
    InsideXOffset => inside_x_offset,
    InsideYOffset => inside_y_offset,
    ProbeDiameter => settings_probe_diameter,
    FastFindRate => settings_fast_find_rate,
    SlowMeasureRate => settings_slow_measure_rate,
    RetractAmount => settings_retract_amount,
}

impl SettingsSnapshot {
    /// Snapshot of a set of values and the selected mode
    pub fn from_values(values: &ParameterValues, mode: Mode) -> Self {
        let mut snapshot = Self {
            settings_work_coordinate_idx: Some(values.work_coordinate_system().index()),
            settings_units_idx: Some(values.units().index()),
            selected_tab_idx: Some(mode.index()),
            ..Self::default()
        };
        for (key, value) in values.iter() {
            *snapshot.field_mut(key) = Some(value);
        }
        snapshot
    }

    /// Capture the live model and selector
    pub fn capture(model: &ParameterModel, selector: &ModeSelector) -> Self {
        Self::from_values(&model.values(), selector.current())
    }

    /// Decode a JSON payload
    ///
    /// # Errors
    /// [`SettingsError::CorruptSnapshot`] when the payload is not a
    /// snapshot object.
    pub fn decode(payload: &str) -> SettingsResult<Self> {
        serde_json::from_str(payload).map_err(|e| SettingsError::CorruptSnapshot(e.to_string()))
    }

    /// Encode as a JSON payload
    pub fn encode(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Apply the snapshot on top of `current`
    ///
    /// Returns the resulting values and mode. Entries missing from the
    /// snapshot keep their values from `current`; a missing mode index
    /// selects `current_mode`.
    ///
    /// # Errors
    /// [`SettingsError::CorruptSnapshot`] if any value is outside its
    /// field's bounds or any index is unknown. Nothing is applied then.
    pub fn restore(
        &self,
        current: &ParameterValues,
        current_mode: Mode,
    ) -> SettingsResult<(ParameterValues, Mode)> {
        let mut values = *current;

        for key in FieldKey::ALL {
            if let Some(value) = self.field(key) {
                values
                    .set(key, value)
                    .map_err(|e| SettingsError::CorruptSnapshot(e.to_string()))?;
            }
        }

        if let Some(idx) = self.settings_units_idx {
            let units = Units::from_index(idx)
                .ok_or_else(|| SettingsError::CorruptSnapshot(format!("unknown units index {}", idx)))?;
            values.set_units(units);
        }

        if let Some(idx) = self.settings_work_coordinate_idx {
            let wcs = WorkCoordinateSystem::from_index(idx).ok_or_else(|| {
                SettingsError::CorruptSnapshot(format!("unknown work coordinate index {}", idx))
            })?;
            values.set_work_coordinate_system(wcs);
        }

        let mode = match self.selected_tab_idx {
            Some(idx) => Mode::from_index(idx)
                .ok_or_else(|| SettingsError::CorruptSnapshot(format!("unknown mode index {}", idx)))?,
            None => current_mode,
        };

        Ok((values, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_uses_persisted_names() {
        let snapshot = SettingsSnapshot::from_values(&ParameterValues::default(), Mode::ZTouch);
        let json = snapshot.encode().unwrap();

        for name in [
            "\"xyzXDistance\":10.0",
            "\"outsideYOffset\":2.0",
            "\"zOffset\":10.0",
            "\"insideXDistance\":10.0",
            "\"settingsFastFindRate\":250.0",
            "\"settingsRetractAmount\":15.0",
            "\"settingsWorkCoordinateIdx\":0",
            "\"settingsUnitsIdx\":0",
            "\"selectedTabIdx\":2",
        ] {
            assert!(json.contains(name), "{} missing from {}", name, json);
        }
    }

    #[test]
    fn test_capture_restore_round_trip() {
        let values = ParameterValues::default()
            .with(FieldKey::OutsideXDistance, 12.345_678_9)
            .and_then(|v| v.with(FieldKey::ProbeDiameter, 3.175))
            .unwrap();
        let mut values = values;
        values.set_units(Units::INCH);
        values.set_work_coordinate_system(WorkCoordinateSystem::G59);

        let payload = SettingsSnapshot::from_values(&values, Mode::InsideCorner)
            .encode()
            .unwrap();
        let (restored, mode) = SettingsSnapshot::decode(&payload)
            .unwrap()
            .restore(&ParameterValues::default(), Mode::Xyz)
            .unwrap();

        assert_eq!(restored, values);
        assert_eq!(mode, Mode::InsideCorner);
    }

    #[test]
    fn test_missing_fields_keep_current() {
        let payload = r#"{"outsideXDistance": 20.0, "selectedTabIdx": 1}"#;
        let current = ParameterValues::default()
            .with(FieldKey::ZDistance, 4.0)
            .unwrap();

        let (values, mode) = SettingsSnapshot::decode(payload)
            .unwrap()
            .restore(&current, Mode::Xyz)
            .unwrap();

        assert_eq!(values.get(FieldKey::OutsideXDistance), 20.0);
        assert_eq!(values.get(FieldKey::ZDistance), 4.0);
        assert_eq!(values.get(FieldKey::ZOffset), 10.0);
        assert_eq!(mode, Mode::OutsideCorner);
    }

    #[test]
    fn test_out_of_range_value_is_corrupt() {
        let payload = r#"{"outsideXDistance": 20.0, "settingsRetractAmount": 2.0}"#;
        let err = SettingsSnapshot::decode(payload)
            .unwrap()
            .restore(&ParameterValues::default(), Mode::Xyz)
            .unwrap_err();
        assert!(matches!(err, SettingsError::CorruptSnapshot(_)));
    }

    #[test]
    fn test_unknown_indices_are_corrupt() {
        for payload in [
            r#"{"settingsUnitsIdx": 2}"#,
            r#"{"settingsWorkCoordinateIdx": 6}"#,
            r#"{"selectedTabIdx": 5}"#,
        ] {
            let result = SettingsSnapshot::decode(payload)
                .unwrap()
                .restore(&ParameterValues::default(), Mode::Xyz);
            assert!(matches!(result, Err(SettingsError::CorruptSnapshot(_))), "{}", payload);
        }
    }

    #[test]
    fn test_malformed_payload_is_corrupt() {
        for payload in ["", "not json", "[1, 2]", r#"{"zDistance": "ten"}"#, r#"{"selectedTabIdx": -1}"#] {
            assert!(
                matches!(
                    SettingsSnapshot::decode(payload),
                    Err(SettingsError::CorruptSnapshot(_))
                ),
                "{}",
                payload
            );
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let payload = r#"{"zDistance": 3.0, "someFutureField": true}"#;
        let snapshot = SettingsSnapshot::decode(payload).unwrap();
        assert_eq!(snapshot.field(FieldKey::ZDistance), Some(3.0));
    }
}
