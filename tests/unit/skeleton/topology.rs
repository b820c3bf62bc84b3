use super::*;

#[test]
fn connection_and_color_lists_are_parallel() {
    for format in [SkeletonFormat::Coco18, SkeletonFormat::Body25] {
        for region in Region::ALL {
            let topo = connections_for(format, region);
            assert_eq!(
                topo.connections.len(),
                topo.colors.len(),
                "{format:?} {region:?}"
            );
            assert_eq!(topo.edges().count(), topo.connections.len());
        }
    }
}

#[test]
fn joint_indices_stay_within_layout() {
    let max_joint = |format, region| {
        connections_for(format, region)
            .connections
            .iter()
            .map(|&(a, b)| a.max(b))
            .max()
            .unwrap()
    };
    assert_eq!(max_joint(SkeletonFormat::Coco18, Region::Pose), 17);
    assert_eq!(max_joint(SkeletonFormat::Body25, Region::Pose), 24);
    assert_eq!(max_joint(SkeletonFormat::Coco18, Region::Face), 67);
    assert_eq!(max_joint(SkeletonFormat::Coco18, Region::HandLeft), 20);
}

#[test]
fn face_and_hands_do_not_depend_on_format() {
    for region in [Region::Face, Region::HandLeft, Region::HandRight] {
        let a = connections_for(SkeletonFormat::Coco18, region);
        let b = connections_for(SkeletonFormat::Body25, region);
        assert_eq!(a.connections, b.connections);
        assert_eq!(a.colors, b.colors);
    }
}

#[test]
fn topology_is_a_graph_with_shared_joints() {
    let topo = connections_for(SkeletonFormat::Coco18, Region::Pose);
    let uses_neck = topo
        .connections
        .iter()
        .filter(|&&(a, b)| a == 1 || b == 1)
        .count();
    assert!(uses_neck > 2);
}

#[test]
fn resolution_class_threshold_is_exclusive() {
    assert_eq!(ResolutionClass::from_width(1300), ResolutionClass::Standard);
    assert_eq!(ResolutionClass::from_width(1301), ResolutionClass::High);
}

#[test]
fn thickness_tables_follow_region_order() {
    let standard: Vec<u32> = Region::ALL
        .iter()
        .map(|&r| thickness_for(ResolutionClass::Standard, r))
        .collect();
    let high: Vec<u32> = Region::ALL
        .iter()
        .map(|&r| thickness_for(ResolutionClass::High, r))
        .collect();
    assert_eq!(standard, vec![2, 1, 2, 2]);
    assert_eq!(high, vec![8, 4, 6, 6]);
    assert_eq!(ResolutionClass::Standard.marker_extra(), 3);
    assert_eq!(ResolutionClass::High.marker_extra(), 12);
}
