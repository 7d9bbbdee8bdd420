use snake_autopilot_core::{Command, Event};
use snake_autopilot_rendering::{
    ControlButton, FrameInput, GridPresentation, RecordingCue, Scene,
};
use snake_autopilot_system_navigator::{self as navigator, Navigator};
use snake_autopilot_world::{self as world, query, World};

use crate::settings::Settings;

/// Owns the authoritative world together with the systems that drive it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    navigator: Navigator,
}

impl Simulation {
    /// Creates a paused session seeded with `seed`.
    pub(crate) fn new(settings: &Settings, seed: u64) -> Self {
        let world = World::new(world::Config::new(seed).with_food_policy(settings.food_policy));
        let navigator = Navigator::new(navigator::Config::new(settings.tail_policy));
        Self { world, navigator }
    }

    /// Scene matching the freshly created session.
    pub(crate) fn initial_scene(&self) -> Scene {
        let mut scene = Scene::new(
            GridPresentation::standard(),
            query::body(&self.world).to_vec(),
            query::food(&self.world),
        );
        self.populate_scene(&mut scene, &[]);
        scene
    }

    /// Advances the session by one frame and refreshes the scene.
    pub(crate) fn update(&mut self, input: FrameInput, scene: &mut Scene) {
        let mut events = Vec::new();
        for command in commands_for(input) {
            events.extend(self.submit(command));
        }
        events.extend(self.submit(Command::Tick));

        self.populate_scene(scene, &events);
    }

    /// Applies `command` and every follow-up command produced by systems
    /// until the world settles, returning all emitted events.
    pub(crate) fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut pending = vec![command];

        while !pending.is_empty() {
            let mut follow_up = Vec::new();
            for command in pending.drain(..) {
                let mut events = Vec::new();
                world::apply(&mut self.world, command, &mut events);
                self.navigator.handle(
                    &events,
                    query::body(&self.world),
                    query::grid(&self.world),
                    &mut follow_up,
                );
                log.extend(events);
            }
            pending = follow_up;
        }

        log
    }

    fn populate_scene(&self, scene: &mut Scene, events: &[Event]) {
        scene.snake.clear();
        scene.snake.extend_from_slice(query::body(&self.world));
        scene.food = query::food(&self.world);
        scene.play_state = query::play_state(&self.world);
        scene.search_method = query::search_method(&self.world);
        scene.recording = recording_cue(events);
    }
}

/// Commands requested by the frame's input, search selection first.
pub(crate) fn commands_for(input: FrameInput) -> Vec<Command> {
    let mut commands = Vec::with_capacity(2);
    if let Some(method) = input.search_method {
        commands.push(Command::SelectSearchMethod { method });
    }
    if let Some(button) = input.button {
        commands.push(match button {
            ControlButton::Start => Command::Start,
            ControlButton::Pause => Command::Pause,
            ControlButton::Reset => Command::Reset,
        });
    }
    commands
}

/// Resets restart the recording and traps export it.
fn recording_cue(events: &[Event]) -> RecordingCue {
    RecordingCue {
        restart: events
            .iter()
            .any(|event| matches!(event, Event::GameReset { .. })),
        export: events
            .iter()
            .any(|event| matches!(event, Event::SnakeTrapped { .. })),
    }
}
