#![allow(dead_code)]

use rtplan_core::units::DoseUnit;
use rtplan_host::dvh::DvhData;
use rtplan_host::memory::MemoryPlan;
use rtplan_host::{Structure, StructureSet};

/// D95% = 45, D50% = 50, max 60, min 40, in the given unit scale.
pub fn ptv_dvh(scale: f64) -> DvhData {
    let samples: Vec<(f64, f64)> = [
        (0.0, 100.0),
        (40.0, 100.0),
        (45.0, 95.0),
        (50.0, 50.0),
        (55.0, 5.0),
        (60.0, 0.0),
    ]
    .iter()
    .map(|&(dose, volume)| (dose * scale, volume))
    .collect();
    DvhData::from_samples(&samples)
}

pub fn structure_set() -> StructureSet {
    StructureSet {
        id: "CT_1".into(),
        structures: vec![
            Structure {
                id: "PTV".into(),
                dicom_type: "PTV".into(),
                volume_cc: 200.0,
                ..Default::default()
            },
            Structure {
                id: "Bowel".into(),
                dicom_type: "ORGAN".into(),
                is_empty: true,
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

pub fn gy_plan() -> MemoryPlan {
    MemoryPlan::new("Plan1", structure_set()).with_dvh("PTV", ptv_dvh(1.0))
}

pub fn cgy_plan() -> MemoryPlan {
    MemoryPlan::new("Plan1", structure_set())
        .with_dose_unit(DoseUnit::CGy)
        .with_dvh("PTV", ptv_dvh(100.0))
}
