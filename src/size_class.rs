use crate::equipment::EquipmentType;
use crate::errors::InvalidSizeClassesError;
use itertools::Itertools;

/// A capacity range in kW. Both bounds are inclusive when selecting table rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeClass {
    pub lower_kw: f64,
    pub upper_kw: f64,
}

impl SizeClass {
    pub const fn new(lower_kw: f64, upper_kw: f64) -> Self {
        Self { lower_kw, upper_kw }
    }

    pub fn contains(&self, capacity_kw: f64) -> bool {
        self.lower_kw <= capacity_kw && capacity_kw <= self.upper_kw
    }

    pub fn bounds(&self) -> [f64; 2] {
        [self.lower_kw, self.upper_kw]
    }

    /// Which of the given capacities fall within this class.
    pub fn row_mask(&self, capacities: &[f64]) -> Vec<bool> {
        capacities
            .iter()
            .map(|&capacity| self.contains(capacity))
            .collect()
    }
}

/// The ordered size classes for one equipment type.
///
/// Index 0 is the aggregate class spanning the whole domain of the equipment type. The remaining
/// classes partition that domain into contiguous sub-ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeClasses {
    equipment_type: EquipmentType,
    classes: Vec<SizeClass>,
}

impl SizeClasses {
    pub fn new(
        equipment_type: EquipmentType,
        classes: Vec<SizeClass>,
    ) -> Result<Self, InvalidSizeClassesError> {
        let invalid = |reason: String| InvalidSizeClassesError::new(equipment_type, reason);

        let Some((aggregate, sub_classes)) = classes.split_first() else {
            return Err(invalid("at least one size class is required".into()));
        };

        for (index, class) in classes.iter().enumerate() {
            // written this way round so that NaN bounds are rejected too
            if !(class.lower_kw < class.upper_kw) {
                return Err(invalid(format!(
                    "class {index} has lower bound {} which is not below its upper bound {}",
                    class.lower_kw, class.upper_kw
                )));
            }
        }

        if let (Some(first), Some(last)) = (sub_classes.first(), sub_classes.last()) {
            if first.lower_kw != aggregate.lower_kw || last.upper_kw != aggregate.upper_kw {
                return Err(invalid(format!(
                    "sub-classes span {} to {} kW but class 0 spans {} to {} kW",
                    first.lower_kw, last.upper_kw, aggregate.lower_kw, aggregate.upper_kw
                )));
            }
        }

        for ((index, previous), (_, next)) in sub_classes.iter().enumerate().tuple_windows() {
            if previous.upper_kw != next.lower_kw {
                return Err(invalid(format!(
                    "class {} ends at {} kW but class {} starts at {} kW",
                    index + 1,
                    previous.upper_kw,
                    index + 2,
                    next.lower_kw
                )));
            }
        }

        Ok(Self {
            equipment_type,
            classes,
        })
    }

    pub fn equipment_type(&self) -> EquipmentType {
        self.equipment_type
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SizeClass> {
        self.classes.iter()
    }

    /// The class spanning the entire domain of the equipment type.
    pub fn aggregate(&self) -> &SizeClass {
        &self.classes[0]
    }

    pub fn sub_classes(&self) -> &[SizeClass] {
        &self.classes[1..]
    }

    /// One row mask per size class, in class order, for a table with the given capacity index.
    pub fn row_masks(&self, capacities: &[f64]) -> Vec<Vec<bool>> {
        self.classes
            .iter()
            .map(|class| class.row_mask(capacities))
            .collect()
    }

    /// Copies a single value into a sequence with one entry per size class.
    pub fn broadcast<T: Clone>(&self, value: T) -> Vec<T> {
        vec![value; self.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn micro_turbine_classes() -> SizeClasses {
        SizeClasses::new(
            EquipmentType::MicroTurbine,
            vec![
                SizeClass::new(30., 950.),
                SizeClass::new(30., 60.),
                SizeClass::new(60., 190.),
                SizeClass::new(190., 950.),
            ],
        )
        .unwrap()
    }

    #[rstest]
    fn test_row_mask_includes_both_bounds() {
        let class = SizeClass::new(60., 190.);
        assert_eq!(
            class.row_mask(&[30., 60., 65., 190., 250.]),
            vec![false, true, true, true, false]
        );
    }

    #[rstest]
    fn test_aggregate_class_selects_whole_domain(micro_turbine_classes: SizeClasses) {
        let capacities = [30., 60., 65., 190., 250., 950., 1000.];
        let masks = micro_turbine_classes.row_masks(&capacities);

        assert_eq!(masks.len(), 4);
        assert_eq!(
            masks[0],
            vec![true, true, true, true, true, true, false]
        );
        assert_eq!(
            masks[3],
            vec![false, false, false, true, true, true, false]
        );
    }

    #[rstest]
    fn test_accessors(micro_turbine_classes: SizeClasses) {
        assert_eq!(micro_turbine_classes.len(), 4);
        assert_eq!(micro_turbine_classes.aggregate().bounds(), [30., 950.]);
        assert_eq!(micro_turbine_classes.sub_classes().len(), 3);
        assert_eq!(micro_turbine_classes.broadcast(0.3), vec![0.3; 4]);
    }

    #[rstest]
    fn test_single_aggregate_class_is_valid() {
        let classes =
            SizeClasses::new(EquipmentType::FuelCell, vec![SizeClass::new(30., 9300.)]).unwrap();
        assert!(classes.sub_classes().is_empty());
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::inverted(vec![SizeClass::new(30., 950.), SizeClass::new(60., 30.), SizeClass::new(60., 950.)])]
    #[case::zero_width(vec![SizeClass::new(30., 30.)])]
    #[case::gap(vec![SizeClass::new(30., 950.), SizeClass::new(30., 60.), SizeClass::new(70., 950.)])]
    #[case::overlap(vec![SizeClass::new(30., 950.), SizeClass::new(30., 80.), SizeClass::new(60., 950.)])]
    #[case::short_of_domain(vec![SizeClass::new(30., 950.), SizeClass::new(30., 60.), SizeClass::new(60., 900.)])]
    #[case::nan_bound(vec![SizeClass::new(f64::NAN, 950.)])]
    fn test_invalid_size_classes_are_rejected(#[case] classes: Vec<SizeClass>) {
        assert!(SizeClasses::new(EquipmentType::MicroTurbine, classes).is_err());
    }

    #[rstest]
    fn test_error_names_equipment_type() {
        let error = SizeClasses::new(
            EquipmentType::CombustionTurbine,
            vec![SizeClass::new(950., 20000.), SizeClass::new(950., 1800.)],
        )
        .unwrap_err();
        assert!(error.to_string().contains("combustion_turbine"));
    }
}
