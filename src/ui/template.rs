//! The fixed markup of a player, with values taken from [`Settings`].

use std::fmt::Write;

use crate::types::control::ControlRole;
use crate::types::settings::Settings;

pub const PLAY_GLYPH: &str = "►";
pub const PAUSE_GLYPH: &str = "❚ ❚";

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: &'static str,
    pub classes: Vec<&'static str>,
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub role: Option<ControlRole>,
    pub children: Vec<Node>,
}

impl Node {
    fn new(tag: &'static str, classes: &[&'static str]) -> Self {
        Node {
            tag,
            classes: classes.to_vec(),
            attrs: Vec::new(),
            text: None,
            role: None,
            children: Vec::new(),
        }
    }

    fn role(mut self, role: ControlRole) -> Self {
        self.role = Some(role);
        self
    }

    fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.attrs.push((name, value.to_string()));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn is_void(&self) -> bool {
        self.tag == "input"
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", self.classes.join(" "));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');
        if self.is_void() {
            return;
        }
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    fn collect<'a>(&'a self, nodes: &mut Vec<&'a Node>) {
        nodes.push(self);
        for child in &self.children {
            child.collect(nodes);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub root: Node,
}

impl Template {
    pub fn render(settings: &Settings) -> Self {
        let progress = Node::new("div", &["progress"])
            .role(ControlRole::ProgressTrack)
            .child(Node::new("div", &["progress__filled"]).role(ControlRole::ProgressFill));

        let controls = Node::new("div", &["player__controls"])
            .child(progress)
            .child(
                Node::new("button", &["player__button", "toggle"])
                    .role(ControlRole::Toggle)
                    .attr("title", "Toggle Play")
                    .text(PLAY_GLYPH),
            )
            .child(
                Node::new("input", &["player__slider"])
                    .role(ControlRole::Volume)
                    .attr("type", "range")
                    .attr("name", "volume")
                    .attr("min", 0)
                    .attr("max", 1)
                    .attr("step", 0.05)
                    .attr("value", settings.volume),
            )
            .child(
                Node::new("input", &["player__slider"])
                    .role(ControlRole::PlaybackRate)
                    .attr("type", "range")
                    .attr("name", "playbackRate")
                    .attr("min", 0.5)
                    .attr("max", 2)
                    .attr("step", 0.1)
                    .attr("value", settings.playback_rate),
            )
            .child(
                Node::new("button", &["player__button1"])
                    .role(ControlRole::SkipBackward)
                    .attr("data-skip", settings.skip_prev)
                    .text(format!("« {}s", settings.skip_prev)),
            )
            .child(
                Node::new("button", &["player__button2"])
                    .role(ControlRole::SkipForward)
                    .attr("data-skip", settings.skip_next)
                    .text(format!("{}s »", settings.skip_next)),
            );

        let root = Node::new("div", &["player"])
            .role(ControlRole::Viewer)
            .child(
                Node::new("video", &["player__video", "viewer"])
                    .role(ControlRole::Video)
                    .attr("src", &settings.source),
            )
            .child(controls);

        Template { root }
    }

    /// Every node, parents before children.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        self.root.collect(&mut nodes);
        nodes
    }

    pub fn node(&self, role: ControlRole) -> Option<&Node> {
        self.nodes().into_iter().find(|n| n.role == Some(role))
    }

    pub fn source(&self) -> Option<&str> {
        self.node(ControlRole::Video)?.get_attr("src")
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.root.write_html(&mut out);
        out
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
