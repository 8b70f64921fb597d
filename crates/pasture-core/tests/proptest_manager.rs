//! Property tests for game object lifetimes under the manager.
//!
//! Random create/remove sequences, issued both from the host between frames
//! and from components during a frame, must leave the live set exactly as
//! the deferred rules predict.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use pasture_core::prelude::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Host doubles
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Node(Vec3);

impl TransformHandle for Node {
    fn position(&self) -> Vec3 {
        self.0
    }
    fn set_position(&mut self, position: Vec3) {
        self.0 = position;
    }
    fn rotation(&self) -> Vec3 {
        Vec3::ZERO
    }
    fn set_rotation(&mut self, _rotation: Vec3) {}
    fn translate_on_axis(&mut self, axis: Vec3, distance: f32) {
        self.0 += axis * distance;
    }
}

struct Root;

impl SceneParent for Root {
    fn attach_child(&mut self, _name: &str) -> Box<dyn TransformHandle> {
        Box::new(Node::default())
    }
}

struct NoInput;

impl InputState for NoInput {
    fn is_down(&self, _direction: Direction) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

type Visits = Rc<RefCell<Vec<GameObjectId>>>;

/// Logs its owner's id each update.
struct Visit(Visits);

impl Component for Visit {
    fn update(&mut self, owner: &mut Owner<'_>, _frame: &mut Frame<'_>) {
        self.0.borrow_mut().push(owner.id());
    }
}

impl Attach for Visit {
    type Config = Visits;

    fn attach(_owner: &mut Owner<'_>, visits: Visits) -> Result<Self, CoreError> {
        Ok(Visit(visits))
    }
}

/// Removes one target object on its first update.
struct RemoveOnce(Option<GameObjectId>);

impl Component for RemoveOnce {
    fn update(&mut self, _owner: &mut Owner<'_>, frame: &mut Frame<'_>) {
        if let Some(target) = self.0.take() {
            frame.remove_game_object(target);
        }
    }
}

impl Attach for RemoveOnce {
    type Config = GameObjectId;

    fn attach(_owner: &mut Owner<'_>, target: GameObjectId) -> Result<Self, CoreError> {
        Ok(RemoveOnce(Some(target)))
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum HostOp {
    Create,
    Remove(usize),
    /// Object `.0` removes object `.1` during the next update.
    RemoveDuringUpdate(usize, usize),
    Update,
}

fn host_op_strategy() -> impl Strategy<Value = HostOp> {
    prop_oneof![
        3 => Just(HostOp::Create),
        1 => (0..32usize).prop_map(HostOp::Remove),
        1 => (0..32usize, 0..32usize).prop_map(|(a, b)| HostOp::RemoveDuringUpdate(a, b)),
        2 => Just(HostOp::Update),
    ]
}

fn run_update(manager: &mut GameObjectManager, shared: &mut Shared) -> usize {
    let mut root = Root;
    let mut ctx = FrameContext {
        time: FrameTime {
            time: 0.0,
            delta_time: 0.016,
        },
        input: &NoInput,
        scene: &mut root,
        shared,
    };
    manager.update(&mut ctx)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1_000))]

    /// After each update the committed live set is creation order minus
    /// every removal applied so far, and every visited object was live.
    #[test]
    fn live_set_tracks_creation_order_minus_removals(
        ops in proptest::collection::vec(host_op_strategy(), 1..60),
    ) {
        let mut manager = GameObjectManager::new();
        let mut shared = Shared::default();
        let visits: Visits = Rc::new(RefCell::new(Vec::new()));
        let mut created: Vec<GameObjectId> = Vec::new();
        // Objects expected to be alive, in creation order.
        let mut expected: Vec<GameObjectId> = Vec::new();
        // (remover, target) pairs armed for the next update.
        let mut armed: Vec<(GameObjectId, GameObjectId)> = Vec::new();

        for op in &ops {
            match *op {
                HostOp::Create => {
                    let mut root = Root;
                    let object = manager.create_game_object(&mut root, "o");
                    object.add_component::<Visit>(Rc::clone(&visits)).unwrap();
                    created.push(object.id());
                    expected.push(object.id());
                }
                HostOp::Remove(index) => {
                    if created.is_empty() {
                        continue;
                    }
                    let id = created[index % created.len()];
                    let was_live = expected.contains(&id);
                    prop_assert_eq!(manager.remove_game_object(id), was_live);
                    expected.retain(|e| *e != id);
                }
                HostOp::RemoveDuringUpdate(a, b) => {
                    if created.is_empty() {
                        continue;
                    }
                    let remover = created[a % created.len()];
                    let target = created[b % created.len()];
                    if remover == target || !expected.contains(&remover) {
                        continue;
                    }
                    manager.add_component::<RemoveOnce>(remover, target).unwrap();
                    armed.push((remover, target));
                }
                HostOp::Update => {
                    // Predict the pass: objects in order, each removing its
                    // armed targets once it is reached.
                    let mut removed_now: Vec<GameObjectId> = Vec::new();
                    let mut expected_seen = Vec::new();
                    for id in &expected {
                        if removed_now.contains(id) {
                            continue;
                        }
                        expected_seen.push(*id);
                        for (remover, target) in &armed {
                            if remover == id && expected.contains(target) {
                                removed_now.push(*target);
                            }
                        }
                    }
                    armed.clear();

                    visits.borrow_mut().clear();
                    let visited = run_update(&mut manager, &mut shared);

                    prop_assert_eq!(visited, expected_seen.len());
                    prop_assert_eq!(visits.borrow().clone(), expected_seen);
                    expected.retain(|e| !removed_now.contains(e));
                    for target in &removed_now {
                        prop_assert!(!manager.contains(*target));
                    }
                    prop_assert_eq!(manager.live_ids(), expected.clone());
                    prop_assert_eq!(manager.len(), expected.len());
                }
            }
        }
    }
}
