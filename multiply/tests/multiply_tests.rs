#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use itertools::Itertools;
    use plater::arrange::{ArrangeConfig, UnplacedPolicy};
    use plater::entities::WorkArea;
    use plater::geometry::DTransformation;
    use plater::geometry::geo_traits::DistanceTo;
    use plater::geometry::primitives::{Point, Rect, SPolygon};
    use test_case::test_case;

    use multiply::MultiplyError;
    use multiply::command::{CommandHistory, Operation};
    use multiply::extract::extract_footprint;
    use multiply::io;
    use multiply::io::export::export_scene;
    use multiply::io::ext_repr::ExtScene;
    use multiply::io::import::import_scene;
    use multiply::notify::Notifier;
    use multiply::placement::Multiplier;
    use multiply::scene::{NodeKey, Scene, SceneNode};

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn started(&self) {
            self.events.lock().unwrap().push("started".to_string());
        }
        fn finished(&self) {
            self.events.lock().unwrap().push("finished".to_string());
        }
        fn partial_failure(&self, n_unplaced: usize) {
            self.events.lock().unwrap().push(format!("partial_failure: {n_unplaced}"));
        }
        fn message(&self, text: &str) {
            self.events.lock().unwrap().push(text.to_string());
        }
    }

    struct Fixture {
        scene: Mutex<Scene>,
        history: Mutex<CommandHistory>,
        notifier: RecordingNotifier,
    }

    impl Fixture {
        fn new(scene: Scene) -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            Fixture {
                scene: Mutex::new(scene),
                history: Mutex::new(CommandHistory::default()),
                notifier: RecordingNotifier::default(),
            }
        }

        fn multiplier(&self, work_area: WorkArea, config: ArrangeConfig) -> Multiplier<'_> {
            Multiplier {
                scene: &self.scene,
                history: &self.history,
                work_area,
                config,
                notifier: &self.notifier,
            }
        }

        fn default_multiplier(&self) -> Multiplier<'_> {
            self.multiplier(
                WorkArea::from_rect(200.0, 200.0).unwrap(),
                ArrangeConfig::default(),
            )
        }
    }

    type NodeSnapshot = (NodeKey, Option<NodeKey>, Vec<NodeKey>, DTransformation, i32);

    /// Everything observable about the nodes reachable from the root
    fn snapshot(scene: &Scene) -> Vec<NodeSnapshot> {
        scene
            .reachable()
            .into_iter()
            .map(|k| {
                let n = scene.node(k).unwrap();
                (k, n.parent(), n.children().to_vec(), n.transform, n.build_plate)
            })
            .collect()
    }

    fn square(size: f64) -> SPolygon {
        SPolygon::from(Rect::from_center(Point(0.0, 0.0), size, size).unwrap())
    }

    fn translated(x: f64, y: f64) -> DTransformation {
        DTransformation::new(0.0, (x, y))
    }

    /// A group of three meshes and a loose mesh on the root
    fn grouped_scene() -> (Scene, NodeKey, Vec<NodeKey>, NodeKey) {
        let mut scene = Scene::new();
        let group = scene
            .add_node(
                SceneNode::group("group")
                    .with_transform(translated(20.0, 10.0))
                    .with_build_plate(2),
                scene.root(),
            )
            .unwrap();
        let members = [-8.0, 0.0, 8.0]
            .into_iter()
            .map(|x| {
                let mesh = SceneNode::mesh("member", square(8.0)).with_transform(translated(x, 0.0));
                scene.add_node(mesh, group).unwrap()
            })
            .collect_vec();
        let loose = scene
            .add_node(
                SceneNode::mesh("loose", square(15.0)).with_transform(translated(-50.0, -50.0)),
                scene.root(),
            )
            .unwrap();
        (scene, group, members, loose)
    }

    #[test]
    fn members_of_one_group_are_duplicated_once() {
        let (scene, group, members, _) = grouped_scene();
        let fixture = Fixture::new(scene);
        let n_before = fixture.scene.lock().unwrap().reachable().len();

        let outcome = fixture
            .default_multiplier()
            .multiply_and_place(&members, 2, 5.0)
            .unwrap();

        assert_eq!(outcome.added.len(), 2);
        assert_eq!(outcome.n_unplaced, 0);
        let scene = fixture.scene.lock().unwrap();
        for copy in &outcome.added {
            let node = scene.node(*copy).unwrap();
            assert!(node.is_group());
            assert_eq!(node.children().len(), 3);
            assert_eq!(node.parent(), Some(scene.root()));
            assert!(scene.dfs(*copy).iter().all(|k| !scene.dfs(group).contains(k)));
        }
        assert_eq!(scene.reachable().len(), n_before + 2 * 4);
    }

    #[test]
    fn copies_inherit_the_build_plate() {
        let (scene, _, members, _) = grouped_scene();
        let fixture = Fixture::new(scene);
        let outcome = fixture
            .default_multiplier()
            .multiply_and_place(&members[..1], 3, 5.0)
            .unwrap();

        let scene = fixture.scene.lock().unwrap();
        for copy in &outcome.added {
            assert!(scene.dfs(*copy).iter().all(|k| scene.node(*k).unwrap().build_plate == 2));
        }
    }

    #[test_case(1; "single copy")]
    #[test_case(4; "four copies")]
    fn copies_keep_their_distance(count: usize) {
        let (scene, group, _, loose) = grouped_scene();
        let fixture = Fixture::new(scene);
        let min_offset = 6.0;
        let outcome = fixture
            .default_multiplier()
            .multiply_and_place(&[loose, group], count, min_offset)
            .unwrap();
        assert_eq!(outcome.n_unplaced, 0);
        assert_eq!(outcome.added.len(), 2 * count);

        let scene = fixture.scene.lock().unwrap();
        let footprints = scene
            .children(scene.root())
            .iter()
            .map(|k| extract_footprint(&scene, *k).unwrap())
            .collect_vec();
        assert_eq!(footprints.len(), 2 + 2 * count);
        for (a, b) in footprints.iter().tuple_combinations() {
            let gap = a.shape.distance_to(b.shape.as_ref());
            assert!(gap >= min_offset - 1e-6, "objects only {gap} apart");
        }
        let plate = Rect::from_center(Point(0.0, 0.0), 200.0, 200.0).unwrap();
        for fp in &footprints {
            assert!(fp.shape.bbox.x_min >= plate.x_min - 1e-3 && fp.shape.bbox.x_max <= plate.x_max + 1e-3);
            assert!(fp.shape.bbox.y_min >= plate.y_min - 1e-3 && fp.shape.bbox.y_max <= plate.y_max + 1e-3);
        }
    }

    #[test]
    fn undo_restores_the_scene_exactly() {
        let (scene, group, _, loose) = grouped_scene();
        let fixture = Fixture::new(scene);
        let before = snapshot(&fixture.scene.lock().unwrap());

        fixture
            .default_multiplier()
            .multiply_and_place(&[group, loose], 3, 5.0)
            .unwrap();
        let after = snapshot(&fixture.scene.lock().unwrap());
        assert_ne!(before, after);

        let mut scene = fixture.scene.lock().unwrap();
        let mut history = fixture.history.lock().unwrap();
        assert!(history.undo(&mut scene).unwrap());
        assert_eq!(snapshot(&scene), before);
        assert!(history.redo(&mut scene).unwrap());
        assert_eq!(snapshot(&scene), after);
    }

    #[test]
    fn repeated_multiply_and_undo_does_not_grow_the_scene() {
        let mut scene = Scene::new();
        let loose = scene
            .add_node(SceneNode::mesh("loose", square(15.0)), scene.root())
            .unwrap();
        let fixture = Fixture::new(scene);

        for _ in 0..5 {
            fixture
                .default_multiplier()
                .multiply_and_place(&[loose], 3, 5.0)
                .unwrap();
            let mut scene = fixture.scene.lock().unwrap();
            assert_eq!(scene.reachable().len(), 4);
            assert_eq!(scene.n_nodes(), 5);

            assert!(fixture.history.lock().unwrap().undo(&mut scene).unwrap());
            assert_eq!(scene.reachable().len(), 1);
        }
        assert_eq!(fixture.history.lock().unwrap().len(), 0);
    }

    #[test]
    fn objects_on_sliceable_parents_are_not_arranged() {
        let mut scene = Scene::new();
        let base = scene
            .add_node(SceneNode::mesh("base", square(40.0)), scene.root())
            .unwrap();
        let support = scene
            .add_node(
                SceneNode::mesh("support", square(5.0)).with_transform(translated(3.0, 4.0)),
                base,
            )
            .unwrap();
        let fixture = Fixture::new(scene);

        let outcome = fixture
            .default_multiplier()
            .multiply_and_place(&[support], 2, 5.0)
            .unwrap();

        assert_eq!(outcome.n_unplaced, 0);
        assert_eq!(outcome.added.len(), 2);
        assert!(
            outcome
                .command
                .operations()
                .iter()
                .all(|op| matches!(op, Operation::AddNode { parent, .. } if *parent == base))
        );
        let scene = fixture.scene.lock().unwrap();
        assert_eq!(scene.children(base).len(), 3);
        for copy in &outcome.added {
            assert_eq!(scene.node(*copy).unwrap().transform, translated(3.0, 4.0));
        }
    }

    #[test]
    fn invalid_handles_are_skipped() {
        let (mut scene, _, _, loose) = grouped_scene();
        let stale = scene.insert_detached(SceneNode::group("stale"));
        scene.remove_subtree(stale).unwrap();
        let detached = scene.insert_detached(SceneNode::mesh("detached", square(5.0)));
        let fixture = Fixture::new(scene);

        let outcome = fixture
            .default_multiplier()
            .multiply_and_place(&[stale, detached, loose], 2, 5.0)
            .unwrap();
        assert_eq!(outcome.added.len(), 2);
    }

    #[test_case(0, 5.0; "zero count")]
    #[test_case(2, 0.0; "zero offset")]
    #[test_case(2, -3.0; "negative offset")]
    fn invalid_requests_fail_before_mutation(count: usize, min_offset: f64) {
        let (scene, group, _, _) = grouped_scene();
        let fixture = Fixture::new(scene);
        let n_nodes = fixture.scene.lock().unwrap().n_nodes();

        let result = fixture
            .default_multiplier()
            .multiply_and_place(&[group], count, min_offset);
        assert!(matches!(result, Err(MultiplyError::InvalidRequest(_))));
        assert_eq!(fixture.scene.lock().unwrap().n_nodes(), n_nodes);
        assert!(!fixture.history.lock().unwrap().can_undo());
        assert!(fixture.notifier.events().is_empty());
    }

    #[test]
    fn invalid_arrange_config_fails_before_mutation() {
        let (scene, group, _, _) = grouped_scene();
        let fixture = Fixture::new(scene);
        let n_nodes = fixture.scene.lock().unwrap().n_nodes();
        let config = ArrangeConfig {
            probe_resolution: 0,
            ..ArrangeConfig::default()
        };
        let result = fixture
            .multiplier(WorkArea::from_rect(200.0, 200.0).unwrap(), config)
            .multiply_and_place(&[group], 1, 5.0);
        assert!(matches!(result, Err(MultiplyError::Arrange(_))));
        assert_eq!(fixture.scene.lock().unwrap().n_nodes(), n_nodes);
    }

    #[test]
    fn unplaced_copies_are_reported() {
        let mut scene = Scene::new();
        let big = scene
            .add_node(SceneNode::mesh("big", square(60.0)), scene.root())
            .unwrap();
        let fixture = Fixture::new(scene);

        let outcome = fixture
            .multiplier(
                WorkArea::from_rect(150.0, 150.0).unwrap(),
                ArrangeConfig::default(),
            )
            .multiply_and_place(&[big], 5, 5.0)
            .unwrap();

        assert!(outcome.n_unplaced > 0);
        //unplaced copies are kept next to the plate
        assert_eq!(outcome.added.len(), 5);
        assert_eq!(
            fixture.notifier.events(),
            vec![
                "started".to_string(),
                format!("partial_failure: {}", outcome.n_unplaced),
                "finished".to_string()
            ]
        );
    }

    #[test]
    fn omitted_copies_are_not_added() {
        let mut scene = Scene::new();
        let big = scene
            .add_node(SceneNode::mesh("big", square(60.0)), scene.root())
            .unwrap();
        let fixture = Fixture::new(scene);
        let config = ArrangeConfig {
            unplaced_policy: UnplacedPolicy::Omit,
            ..ArrangeConfig::default()
        };

        let outcome = fixture
            .multiplier(WorkArea::from_rect(150.0, 150.0).unwrap(), config)
            .multiply_and_place(&[big], 5, 5.0)
            .unwrap();

        assert!(outcome.n_unplaced > 0);
        assert_eq!(outcome.added.len(), 5 - outcome.n_unplaced);
        let scene = fixture.scene.lock().unwrap();
        assert_eq!(scene.reachable().len(), 1 + outcome.added.len());
        assert_eq!(scene.n_nodes(), 2 + outcome.added.len());
    }

    #[test]
    fn sample_scene_round_trip() {
        let ext_scene: ExtScene = io::read_json(Path::new("assets/plate.json")).unwrap();
        let imported = import_scene(&ext_scene).unwrap();
        assert_eq!(imported.selection.len(), 3);

        let fixture = Fixture::new(imported.scene);
        let outcome = fixture
            .multiplier(imported.work_area, ArrangeConfig::default())
            .multiply_and_place(&imported.selection, 2, 8.0)
            .unwrap();
        //the two gears share a group
        assert_eq!(outcome.added.len(), 4);
        assert_eq!(outcome.n_unplaced, 0);

        let scene = fixture.scene.lock().unwrap();
        let mut ids = imported.ids;
        let exported = export_scene(&scene, &ext_scene.work_area, &mut ids);
        assert_eq!(exported.nodes.len(), 6);
        assert!(outcome.added.iter().all(|k| ids[k] > 4));
        assert!(ids.values().all_unique());
    }
}
