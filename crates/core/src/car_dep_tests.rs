// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn roundtrips_through_json() {
    let dep = CarDep {
        car_id: "car-2".into(),
        blocked_by: "car-1".into(),
        dep_type: DepType::Blocks,
    };
    let json = serde_json::to_string(&dep).expect("serialize");
    let back: CarDep = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.car_id, "car-2");
    assert_eq!(back.blocked_by, "car-1");
    assert_eq!(back.dep_type, DepType::Blocks);
}
