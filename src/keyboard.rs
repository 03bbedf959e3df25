use std::collections::HashMap;
use std::time::{Duration, Instant};

use bevy::app::AppExit;
use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::field::DotField;
use crate::Notices;

/// Defines a keyboard command to associate with a keypress.
/// Each command can have a different repeat rate.
pub struct KeyboardCommand {
    pub description: String,
    pub last_action_time: Instant,
    pub interval: Duration,
    pub action: KeyboardAction,
}

/// The function that invokes the keyboard action.
type KeyboardAction = fn(
    field: &mut DotField,
    // true == shift is pressed
    shift: bool,
    notices: &mut Notices,
);

/// Contains the collection of keyboard commands.
#[derive(Component)]
pub struct KeyboardCommands {
    pub commands: HashMap<KeyCode, KeyboardCommand>,
}

impl KeyboardCommands {
    pub fn create() -> Self {
        let mut kb_cmds = KeyboardCommands {
            commands: HashMap::new(),
        };

        // Space: freeze / unfreeze dot motion.
        kb_cmds.add_command(KeyCode::Space, "Pause", 250, pause);
        // 1: advance 1 frame.
        kb_cmds.add_command(KeyCode::Digit1, "Advance 1 frame", 250, |field, _, _| field.set_frames_to_show(1));
        // D: log field statistics
        kb_cmds.add_command(KeyCode::KeyD, "Log field statistics", 250, |field, _, _| field.log_stats());
        // I: increase/decrease the mouse interaction radius
        kb_cmds.add_command(KeyCode::KeyI, "Decrease interaction radius (shift: increase)", 100, adj_interaction_radius);
        // L: toggle links between dots
        kb_cmds.add_command(KeyCode::KeyL, "Toggle links", 250, toggle_links);
        // R: lay the grid out again
        kb_cmds.add_command(KeyCode::KeyR, "Reset dots", 250, |field, _, _| field.reset());
        // S: increase/decrease grid spacing
        kb_cmds.add_command(KeyCode::KeyS, "Decrease spacing (shift: increase)", 150, adj_spacing);

        kb_cmds
    }

    pub fn add_command(&mut self, key: KeyCode, description: &str, interval_millis: u64, action: KeyboardAction) {
        self.commands.insert(
            key,
            KeyboardCommand {
                description: description.into(),
                last_action_time: Instant::now(),
                interval: Duration::from_millis(interval_millis),
                action,
            },
        );
    }
}

fn pause(field: &mut DotField, _shift: bool, notices: &mut Notices) {
    if field.frames_to_advance() == 0 {
        field.set_frames_to_show(u32::MAX);
        notices.push("Running", Duration::from_secs(1));
    } else {
        field.set_frames_to_show(0);
        notices.push("Paused", Duration::from_secs(1));
    }
}

fn adj_interaction_radius(field: &mut DotField, shift: bool, notices: &mut Notices) {
    if shift {
        field.adj_interaction_radius(10.0);
    } else {
        field.adj_interaction_radius(-10.0);
    }
    notices.push(
        format!("Interaction radius: {:.0}", field.tunables.interaction_radius),
        Duration::from_secs(1),
    );
}

fn adj_spacing(field: &mut DotField, shift: bool, notices: &mut Notices) {
    if shift {
        field.adj_spacing(5.0);
    } else {
        field.adj_spacing(-5.0);
    }
    notices.push(
        format!("Spacing: {:.0} ({} dots)", field.tunables.spacing, field.particles.len()),
        Duration::from_secs(1),
    );
}

fn toggle_links(field: &mut DotField, _shift: bool, notices: &mut Notices) {
    field.toggle_links();
    notices.push(
        format!("Links {}", if field.show_links { "on" } else { "off" }),
        Duration::from_secs(1),
    );
}

pub fn handle_keypress(
    kb: Res<ButtonInput<KeyCode>>,
    mut app_exit: MessageWriter<AppExit>,
    mut field: Single<&mut DotField>,
    mut kb_cmds: Single<&mut KeyboardCommands>,
    mut notices: Single<&mut Notices>,
) {
    // Esc / Q: stop the field and quit the app
    if kb.pressed(KeyCode::Escape) || kb.pressed(KeyCode::KeyQ) {
        field.teardown();
        app_exit.write(AppExit::Success);
        return;
    }

    let shift = kb.pressed(KeyCode::ShiftLeft) || kb.pressed(KeyCode::ShiftRight);

    // ?: display help
    if kb.just_pressed(KeyCode::Slash) && shift {
        let kb_help = "Keyboard commands:";
        // Are we already displaying it?
        if notices.notices.iter().any(|notice| notice.text.starts_with(kb_help)) {
            return;
        }

        let mut lines: Vec<String> = kb_cmds
            .commands
            .iter()
            .map(|(key, cmd)| format!("{key:?} - {}", cmd.description))
            .collect();
        lines.sort();
        lines.insert(0, kb_help.into());
        lines.push("Escape / KeyQ - Quit".into());
        notices.push(lines.join("\n"), Duration::from_secs(5));
    }

    let now = Instant::now();
    for key in kb.get_pressed() {
        if let Some(command) = kb_cmds.commands.get_mut(key) {
            if now.duration_since(command.last_action_time) >= command.interval {
                command.last_action_time = now;
                (command.action)(&mut field, shift, &mut notices);
            }
        }
    }
}
