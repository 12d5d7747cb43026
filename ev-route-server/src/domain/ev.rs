//! Vehicle specification and the range model derived from it.

use super::DomainError;

/// Battery and consumption characteristics of a vehicle for one trip.
///
/// State-of-charge values are fractions of usable capacity in `0..=1`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvSpec {
    pub battery_capacity_kwh: f64,
    /// Share of the nominal capacity the vehicle lets you use, in `(0, 1]`.
    pub usable_soc_fraction: f64,
    pub consumption_wh_per_km: f64,
    /// Peak DC charge rate the vehicle accepts.
    pub max_charge_kw: f64,
    pub start_soc: f64,
    /// Never planned below this.
    pub reserve_soc: f64,
}

impl EvSpec {
    /// Check every field against its documented domain.
    ///
    /// Reports the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        positive("batteryCapacityKwh", self.battery_capacity_kwh)?;

        let usable = self.usable_soc_fraction;
        if !usable.is_finite() || usable <= 0.0 || usable > 1.0 {
            return Err(DomainError::invalid(
                "usableSoCFraction",
                "must be within (0, 1]",
            ));
        }

        positive("consumptionWhPerKm", self.consumption_wh_per_km)?;
        positive("maxChargeKw", self.max_charge_kw)?;

        if !self.start_soc.is_finite() || !(0.0..=1.0).contains(&self.start_soc) {
            return Err(DomainError::invalid("startSoC", "must be within [0, 1]"));
        }
        if !self.reserve_soc.is_finite() || !(0.0..1.0).contains(&self.reserve_soc) {
            return Err(DomainError::invalid("reserveSoC", "must be within [0, 1)"));
        }
        if self.reserve_soc >= self.start_soc {
            return Err(DomainError::invalid(
                "reserveSoC",
                format!(
                    "({}) must be below startSoC ({})",
                    self.reserve_soc, self.start_soc
                ),
            ));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::invalid(field, "must be positive"));
    }
    Ok(())
}

/// Range and energy arithmetic for a validated [`EvSpec`].
///
/// # Examples
///
/// ```
/// use ev_route_server::domain::{EvSpec, RangeModel};
///
/// let model = RangeModel::new(EvSpec {
///     battery_capacity_kwh: 75.0,
///     usable_soc_fraction: 0.9,
///     consumption_wh_per_km: 160.0,
///     max_charge_kw: 250.0,
///     start_soc: 0.8,
///     reserve_soc: 0.1,
/// })
/// .unwrap();
///
/// assert!((model.usable_kwh() - 67.5).abs() < 1e-9);
/// assert!((model.max_range_km(0.8) - 295.3125).abs() < 1e-9);
/// assert_eq!(model.max_range_km(0.05), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RangeModel {
    spec: EvSpec,
}

impl RangeModel {
    /// Validate `spec` and build its range model.
    pub fn new(spec: EvSpec) -> Result<Self, DomainError> {
        spec.validate()?;
        Ok(Self { spec })
    }

    /// The validated vehicle specification.
    pub fn spec(&self) -> &EvSpec {
        &self.spec
    }

    /// Usable battery energy in kWh.
    pub fn usable_kwh(&self) -> f64 {
        self.spec.battery_capacity_kwh * self.spec.usable_soc_fraction
    }

    /// Distance a full usable battery covers, ignoring the reserve.
    pub fn full_range_km(&self) -> f64 {
        self.usable_kwh() * 1000.0 / self.spec.consumption_wh_per_km
    }

    /// Planning range from `soc` down to the reserve, never negative.
    pub fn max_range_km(&self, soc: f64) -> f64 {
        (self.full_range_km() * (soc - self.spec.reserve_soc)).max(0.0)
    }

    /// Energy in kWh needed to drive `km`.
    pub fn energy_for_distance(&self, km: f64) -> f64 {
        km * self.spec.consumption_wh_per_km / 1000.0
    }

    /// State-of-charge fraction that `kwh` represents.
    pub fn soc_for_energy(&self, kwh: f64) -> f64 {
        kwh / self.usable_kwh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> EvSpec {
        EvSpec {
            battery_capacity_kwh: 75.0,
            usable_soc_fraction: 0.9,
            consumption_wh_per_km: 160.0,
            max_charge_kw: 250.0,
            start_soc: 0.8,
            reserve_soc: 0.1,
        }
    }

    fn field_of(err: DomainError) -> &'static str {
        match err {
            DomainError::InvalidSpecification { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_spec_passes() {
        assert!(spec().validate().is_ok());
    }

    #[test]
    fn reserve_above_start_is_rejected() {
        let ev = EvSpec {
            start_soc: 0.3,
            reserve_soc: 0.5,
            ..spec()
        };
        assert_eq!(field_of(ev.validate().unwrap_err()), "reserveSoC");

        let ev = EvSpec {
            start_soc: 0.3,
            reserve_soc: 0.3,
            ..spec()
        };
        assert!(ev.validate().is_err());
    }

    #[test]
    fn each_field_is_checked() {
        let cases = [
            (EvSpec { battery_capacity_kwh: 0.0, ..spec() }, "batteryCapacityKwh"),
            (EvSpec { usable_soc_fraction: 0.0, ..spec() }, "usableSoCFraction"),
            (EvSpec { usable_soc_fraction: 1.1, ..spec() }, "usableSoCFraction"),
            (EvSpec { consumption_wh_per_km: -1.0, ..spec() }, "consumptionWhPerKm"),
            (EvSpec { max_charge_kw: f64::INFINITY, ..spec() }, "maxChargeKw"),
            (EvSpec { start_soc: 1.2, ..spec() }, "startSoC"),
            (EvSpec { reserve_soc: 1.0, start_soc: 1.0, ..spec() }, "reserveSoC"),
            (EvSpec { reserve_soc: f64::NAN, ..spec() }, "reserveSoC"),
        ];

        for (ev, field) in cases {
            assert_eq!(field_of(ev.validate().unwrap_err()), field, "{ev:?}");
        }
    }

    #[test]
    fn usable_fraction_of_one_is_allowed() {
        let ev = EvSpec {
            usable_soc_fraction: 1.0,
            ..spec()
        };
        assert!(ev.validate().is_ok());
    }

    #[test]
    fn range_model_arithmetic() {
        let model = RangeModel::new(spec()).unwrap();

        assert!((model.full_range_km() - 421.875).abs() < 1e-9);
        assert!((model.energy_for_distance(100.0) - 16.0).abs() < 1e-9);
        assert!((model.soc_for_energy(6.75) - 0.1).abs() < 1e-9);
        assert_eq!(model.max_range_km(0.1), 0.0);
    }

    #[test]
    fn range_model_rejects_invalid_spec() {
        let ev = EvSpec {
            start_soc: 0.3,
            reserve_soc: 0.5,
            ..spec()
        };
        assert!(matches!(
            RangeModel::new(ev),
            Err(DomainError::InvalidSpecification { .. })
        ));
    }
}
