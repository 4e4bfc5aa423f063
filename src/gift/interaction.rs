use glam::Vec2;

use crate::gift::scene_binder::OutlineSet;
use crate::scene::{Camera, Scene};

/// A hit counts when the nearest mesh's parent has one of these names.
pub const SELECTABLE_PARENTS: [&str; 8] = [
    "Present_Box",
    "Present_Top",
    "Box_Tie_A",
    "Box_Tie_B",
    "Ribbon_Bow",
    "Ribbon_End_L",
    "Ribbon_End_R",
    "Ribbon_Knot",
];

/// Client-space bounds of the element the widget renders into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Maps client coordinates to normalized device coordinates, `+y` up.
    #[must_use]
    pub fn to_ndc(&self, client_x: f32, client_y: f32) -> Vec2 {
        Vec2::new(
            ((client_x - self.left) / self.width) * 2.0 - 1.0,
            -((client_y - self.top) / self.height) * 2.0 + 1.0,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// Latched on the first qualifying click.
    pub opened: bool,
    /// Whether the pointer was over the present at the last test.
    pub hovered_selectable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Not over the present.
    Miss,
    /// Over the present; the outline set is highlighted.
    Hover,
    /// Qualifying click: the present should open now.
    Open,
}

/// Turns pointer positions into hover and open decisions.
#[derive(Debug)]
pub struct InteractionRouter {
    rect: ContainerRect,
    pointer: Vec2,
    state: InteractionState,
}

impl InteractionRouter {
    #[must_use]
    pub fn new(rect: ContainerRect) -> Self {
        Self {
            rect,
            pointer: Vec2::ZERO,
            state: InteractionState::default(),
        }
    }

    pub fn set_rect(&mut self, rect: ContainerRect) {
        self.rect = rect;
    }

    #[must_use]
    pub fn rect(&self) -> ContainerRect {
        self.rect
    }

    /// Last pointer position in NDC.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn pointer_move(
        &mut self,
        client_x: f32,
        client_y: f32,
        scene: &Scene,
        camera: &Camera,
        outline: &mut OutlineSet,
    ) -> PointerOutcome {
        self.pointer = self.rect.to_ndc(client_x, client_y);
        self.check(false, scene, camera, outline)
    }

    pub fn pointer_up(
        &mut self,
        client_x: f32,
        client_y: f32,
        scene: &Scene,
        camera: &Camera,
        outline: &mut OutlineSet,
    ) -> PointerOutcome {
        self.pointer = self.rect.to_ndc(client_x, client_y);
        self.check(true, scene, camera, outline)
    }

    fn check(
        &mut self,
        clicked: bool,
        scene: &Scene,
        camera: &Camera,
        outline: &mut OutlineSet,
    ) -> PointerOutcome {
        let selectable = is_selectable_hit(scene, camera, self.pointer);
        self.state.hovered_selectable = selectable;

        if !selectable {
            outline.clear_highlight();
            return PointerOutcome::Miss;
        }

        outline.highlight_all();

        if clicked && !self.state.opened {
            self.state.opened = true;
            outline.clear();
            log::info!("Present clicked");
            return PointerOutcome::Open;
        }

        PointerOutcome::Hover
    }
}

/// Whether the nearest hit at `ndc` is part of the present. A hit node
/// without a parent never qualifies.
#[must_use]
pub fn is_selectable_hit(scene: &Scene, camera: &Camera, ndc: Vec2) -> bool {
    let ray = camera.ray_from_ndc(ndc);
    scene
        .raycast_nearest(&ray)
        .and_then(|hit| scene.parent_name(hit.node))
        .is_some_and(|name| SELECTABLE_PARENTS.contains(&name))
}
