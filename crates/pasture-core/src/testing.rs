//! Minimal collaborator doubles shared by this crate's unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::component::{Attach, Component, Owner};
use crate::external::{Direction, InputState, SceneParent, TransformHandle};
use crate::frame::{Frame, FrameContext, FrameTime, Shared};
use crate::identity::GameObjectId;
use crate::manager::GameObjectManager;
use crate::CoreError;

#[derive(Debug, Default)]
pub(crate) struct Node {
    position: Vec3,
    rotation: Vec3,
}

impl TransformHandle for Node {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Vec3 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    fn translate_on_axis(&mut self, axis: Vec3, distance: f32) {
        self.position += axis * distance;
    }
}

/// Scene root that remembers the names of attached children.
#[derive(Debug, Default)]
pub(crate) struct Root {
    pub attached: Vec<String>,
}

impl SceneParent for Root {
    fn attach_child(&mut self, name: &str) -> Box<dyn TransformHandle> {
        self.attached.push(name.to_owned());
        Box::new(Node::default())
    }
}

pub(crate) struct NoInput;

impl InputState for NoInput {
    fn is_down(&self, _direction: Direction) -> bool {
        false
    }
}

/// Run one manager update with a fixed 1/60 s step.
pub(crate) fn step(manager: &mut GameObjectManager, root: &mut Root, shared: &mut Shared) -> usize {
    let mut ctx = FrameContext {
        time: FrameTime {
            time: 0.0,
            delta_time: 1.0 / 60.0,
        },
        input: &NoInput,
        scene: root,
        shared,
    };
    manager.update(&mut ctx)
}

/// Ordered log of `(object name, tag)` pairs written by test components.
pub(crate) type Log = Rc<RefCell<Vec<String>>>;

/// Appends `"<object>:<tag>"` to a log on every update.
pub(crate) struct Recorder {
    pub log: Log,
    pub tag: &'static str,
}

impl Component for Recorder {
    fn update(&mut self, owner: &mut Owner<'_>, _frame: &mut Frame<'_>) {
        self.log
            .borrow_mut()
            .push(format!("{}:{}", owner.name(), self.tag));
    }
}

impl Attach for Recorder {
    type Config = (Log, &'static str);

    fn attach(_owner: &mut Owner<'_>, (log, tag): Self::Config) -> Result<Self, CoreError> {
        Ok(Self { log, tag })
    }
}

/// Runs a one-shot closure against the frame on its first update.
pub(crate) struct OnFirstUpdate {
    action: Option<Box<dyn FnOnce(&mut Owner<'_>, &mut Frame<'_>)>>,
}

impl Component for OnFirstUpdate {
    fn update(&mut self, owner: &mut Owner<'_>, frame: &mut Frame<'_>) {
        if let Some(action) = self.action.take() {
            action(owner, frame);
        }
    }
}

impl Attach for OnFirstUpdate {
    type Config = Box<dyn FnOnce(&mut Owner<'_>, &mut Frame<'_>)>;

    fn attach(_owner: &mut Owner<'_>, action: Self::Config) -> Result<Self, CoreError> {
        Ok(Self {
            action: Some(action),
        })
    }
}

/// Box a one-shot action for [`OnFirstUpdate`].
pub(crate) fn once<F>(action: F) -> Box<dyn FnOnce(&mut Owner<'_>, &mut Frame<'_>)>
where
    F: FnOnce(&mut Owner<'_>, &mut Frame<'_>) + 'static,
{
    Box::new(action)
}

/// Create a named object carrying a [`Recorder`].
pub(crate) fn recorded(
    manager: &mut GameObjectManager,
    root: &mut Root,
    name: &str,
    log: &Log,
) -> GameObjectId {
    let object = manager.create_game_object(root, name);
    object
        .add_component::<Recorder>((Rc::clone(log), "update"))
        .expect("recorder attaches");
    object.id()
}
