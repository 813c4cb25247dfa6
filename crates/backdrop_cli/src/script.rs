//! Scripted viewport input
//!
//! `--resize 1024x768@30` resizes before frame 30,
//! `--pointer 400,300@10` moves the pointer before frame 10.

use backdrop::ViewportEvent;

/// A viewport event delivered before a given frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedEvent {
    pub frame: u64,
    pub event: ViewportEvent,
}

fn split_frame(s: &str) -> Result<(&str, u64), String> {
    let (value, frame) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("missing '@FRAME' in '{s}'"))?;
    let frame = frame
        .trim()
        .parse()
        .map_err(|_| format!("invalid frame number '{frame}'"))?;
    Ok((value, frame))
}

fn parse_pair(s: &str, separator: char) -> Result<(f32, f32), String> {
    let (a, b) = s
        .split_once(separator)
        .ok_or_else(|| format!("expected two numbers separated by '{separator}' in '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|_| format!("invalid number '{v}'"))
    };
    Ok((parse(a)?, parse(b)?))
}

/// Parse `WxH@FRAME`
pub fn parse_resize(s: &str) -> Result<ScriptedEvent, String> {
    let (size, frame) = split_frame(s)?;
    let (width, height) = parse_pair(size, 'x')?;
    Ok(ScriptedEvent {
        frame,
        event: ViewportEvent::resize(width, height),
    })
}

/// Parse `X,Y@FRAME`
pub fn parse_pointer(s: &str) -> Result<ScriptedEvent, String> {
    let (position, frame) = split_frame(s)?;
    let (x, y) = parse_pair(position, ',')?;
    Ok(ScriptedEvent {
        frame,
        event: ViewportEvent::pointer_move(x, y),
    })
}

/// Merge event lists into frame order, keeping argument order within a frame
pub fn ordered(mut events: Vec<ScriptedEvent>) -> Vec<ScriptedEvent> {
    events.sort_by_key(|e| e.frame);
    events
}
