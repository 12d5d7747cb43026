//! Built-in vehicle presets.

use crate::domain::EvSpec;

/// Starting charge for every preset.
const START_SOC: f64 = 0.8;

/// Reserve for every preset.
const RESERVE_SOC: f64 = 0.1;

/// A named vehicle specification.
#[derive(Debug, Clone, PartialEq)]
pub struct EvPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub spec: EvSpec,
}

const fn preset(
    id: &'static str,
    name: &'static str,
    battery_capacity_kwh: f64,
    consumption_wh_per_km: f64,
    max_charge_kw: f64,
) -> EvPreset {
    EvPreset {
        id,
        name,
        spec: EvSpec {
            battery_capacity_kwh,
            usable_soc_fraction: 0.9,
            consumption_wh_per_km,
            max_charge_kw,
            start_soc: START_SOC,
            reserve_soc: RESERVE_SOC,
        },
    }
}

/// The presets offered to clients, in display order.
pub static PRESETS: [EvPreset; 7] = [
    preset("tesla-model-3-lr", "Tesla Model 3 Long Range", 75.0, 160.0, 250.0),
    preset("tesla-model-y-lr", "Tesla Model Y Long Range", 75.0, 170.0, 250.0),
    preset("tesla-model-s-lr", "Tesla Model S Long Range", 100.0, 180.0, 250.0),
    preset("tesla-model-x-lr", "Tesla Model X Long Range", 100.0, 200.0, 250.0),
    preset("ford-mustang-mach-e", "Ford Mustang Mach-E", 88.0, 175.0, 150.0),
    preset("chevrolet-bolt-ev", "Chevrolet Bolt EV", 66.0, 150.0, 55.0),
    preset("nissan-leaf-plus", "Nissan Leaf Plus", 62.0, 160.0, 100.0),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_preset_is_valid() {
        for preset in &PRESETS {
            assert!(preset.spec.validate().is_ok(), "{}", preset.name);
        }
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = PRESETS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), PRESETS.len());
    }

    #[test]
    fn bolt_preset() {
        let bolt = PRESETS.iter().find(|p| p.id == "chevrolet-bolt-ev").unwrap();
        assert_eq!(bolt.spec.max_charge_kw, 55.0);
        assert_eq!(bolt.spec.battery_capacity_kwh, 66.0);
    }
}
