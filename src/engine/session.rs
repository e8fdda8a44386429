use tracing::{debug, trace_span};

use super::raycaster;
use crate::{
    input::{InputEvent, InputSource},
    math::Fixed,
    renderer::{Canvas, Display, Framebuffer, Rgb},
    world::{Camera, Map, Strafe, Travel, Turn},
};

/// Tunables that stay fixed for the life of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Distance per move or strafe, position scale.
    pub move_step: Fixed,
    /// Degrees per turn event.
    pub turn_step: i32,
    pub ceiling: Rgb,
    pub floor: Rgb,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            move_step: Fixed::from_raw(150),
            turn_step: 3,
            ceiling: Rgb::new(20, 20, 20),
            floor: Rgb::new(50, 50, 50),
        }
    }
}

/// What one call to [`RenderSession::run_frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Index of the frame just shown, starting at 0.
    pub frame: u64,
    /// Event applied after the frame was shown, if any.
    pub event: Option<InputEvent>,
}

/// Map, camera and settings for the running view.
#[derive(Clone, Debug)]
pub struct RenderSession {
    map: Map,
    camera: Camera,
    config: SessionConfig,
    frame: u64,
}

impl RenderSession {
    /// `map` must have a solid border; rays rely on it to stop.
    pub fn new(map: Map, camera: Camera, config: SessionConfig) -> Self {
        debug_assert!(map.is_sealed(), "map border has an opening");
        Self {
            map,
            camera,
            config,
            frame: 0,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Frames shown so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Paint the current view into `canvas`.
    pub fn render<C: Canvas>(&self, canvas: &mut C) {
        raycaster::render_view(
            canvas,
            &self.camera,
            &self.map,
            self.config.ceiling,
            self.config.floor,
        );
    }

    /// Update the camera for one event.
    pub fn apply(&mut self, event: InputEvent) {
        let step = self.config.move_step;
        let deg = self.config.turn_step;
        let map = &self.map;
        let cam = &mut self.camera;

        match event {
            InputEvent::MoveForward => cam.advance(map, Travel::Forward, step),
            InputEvent::MoveBackward => cam.advance(map, Travel::Backward, step),
            InputEvent::TurnLeft => cam.rotate(Turn::Left, deg),
            InputEvent::TurnRight => cam.rotate(Turn::Right, deg),
            InputEvent::StrafeLeft => cam.strafe(map, Strafe::Left, step),
            InputEvent::StrafeRight => cam.strafe(map, Strafe::Right, step),
        }
        debug!(?event, tile = ?cam.tile(), "input applied");
    }

    /// One turn of the loop: render, present, scan out, poll, apply.
    ///
    /// The event polled here shows up in the *next* frame.
    pub fn run_frame<H>(
        &mut self,
        fb: &mut Framebuffer<'_>,
        host: &mut H,
    ) -> Result<FrameReport, H::Error>
    where
        H: Display + InputSource,
    {
        let _span = trace_span!("frame", n = self.frame).entered();

        /*----------- 1. draw -----------*/
        self.render(fb);
        fb.present();

        /*----------- 2. show -----------*/
        host.scanout(fb.front(), fb.stride(), fb.height() as usize)?;

        /*----------- 3. react ----------*/
        let event = host.poll();
        if let Some(ev) = event {
            self.apply(ev);
        }

        let report = FrameReport {
            frame: self.frame,
            event,
        };
        self.frame += 1;
        Ok(report)
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Headless;
    use crate::input::Scripted;
    use crate::math::FIXED_ONE;
    use crate::renderer::{SurfaceInfo, Target};
    use glam::IVec2;

    fn session() -> RenderSession {
        RenderSession::new(
            Map::reference(),
            Camera::spawn(IVec2::new(22, 12)),
            SessionConfig::default(),
        )
    }

    #[test]
    fn forward_then_back_returns_to_spawn() {
        let mut s = session();
        s.apply(InputEvent::MoveForward);
        assert_eq!(s.camera().pos().x.raw(), 22 * FIXED_ONE - 150);
        s.apply(InputEvent::MoveBackward);
        assert_eq!(*s.camera(), Camera::spawn(IVec2::new(22, 12)));
    }

    #[test]
    fn turn_events_use_configured_step() {
        let mut s = RenderSession::new(
            Map::reference(),
            Camera::spawn(IVec2::new(22, 12)),
            SessionConfig {
                turn_step: 90,
                ..SessionConfig::default()
            },
        );
        s.apply(InputEvent::TurnLeft);
        // −x rotated a quarter turn counter-clockwise is −y
        assert_eq!(s.camera().dir().y.raw(), -FIXED_ONE);
    }

    #[test]
    fn run_frame_shows_then_applies() {
        let info = SurfaceInfo::packed(64, 48);
        let mut mem = vec![0; info.required_words()];
        let mut fb = Framebuffer::new(&mut mem, info).unwrap();
        let mut host = Headless::new(Scripted::new([Some(InputEvent::MoveForward), None]));
        let mut s = session();

        let r0 = s.run_frame(&mut fb, &mut host).unwrap();
        assert_eq!(r0, FrameReport { frame: 0, event: Some(InputEvent::MoveForward) });
        // the frame on screen was drawn from spawn, the camera moved after
        assert_eq!(fb.pixel(Target::Front, 32, 24), fb.pixel(Target::Back, 32, 24));
        assert_eq!(s.camera().pos().x.raw(), 22 * FIXED_ONE - 150);

        let r1 = s.run_frame(&mut fb, &mut host).unwrap();
        assert_eq!(r1, FrameReport { frame: 1, event: None });
        assert_eq!(s.frame(), 2);
        assert_eq!(host.frames_shown(), 2);
        assert_eq!(s.camera().pos().x.raw(), 22 * FIXED_ONE - 150);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "map border has an opening")]
    fn open_border_is_rejected() {
        RenderSession::new(
            Map::arena().with_cell(IVec2::new(23, 10), 0),
            Camera::spawn(IVec2::new(5, 5)),
            SessionConfig::default(),
        );
    }
}
