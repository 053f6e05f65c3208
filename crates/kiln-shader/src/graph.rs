use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use kiln_assets::ImageHandle;
use kiln_mesh::UvChannelBindings;
use serde::Serialize;

use crate::error::ShaderError;

/// Identifier of a node within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Named node ports. Which sockets a node has is fixed by its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Socket {
    Surface,
    Bsdf,
    BaseColor,
    Metallic,
    Roughness,
    Fac,
    Color1,
    Color2,
    Color,
    Alpha,
    A,
    B,
    Value,
    Red,
    Green,
    Blue,
    Image,
    Vector,
    Uv,
}

impl Socket {
    /// Colour channel sockets by index: red, green, blue.
    pub const CHANNELS: [Socket; 3] = [Socket::Red, Socket::Green, Socket::Blue];
}

/// A static socket value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Value {
    Float(f32),
    Rgba([f32; 4]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MathOp {
    Multiply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlendType {
    Multiply,
}

/// How the renderer interprets sampled texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColorSpace {
    Color,
    NonColor,
}

/// The image an image-texture node samples. `Broken` keeps the handle so
/// the host can show what was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageSlot {
    Linked(ImageHandle),
    Broken(ImageHandle),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    MaterialOutput,
    PrincipledBsdf,
    VertexColor { attribute: String },
    MixRgb { blend: BlendType },
    Math { op: MathOp },
    SeparateRgb,
    CombineRgb,
    ImageTexture { image: ImageSlot, color_space: ColorSpace },
    Mapping,
    /// Texture coordinate source. `uv_map` stays unset until the owning
    /// mesh's UV layers exist and the graph is bound to them.
    UvMap { tex_coord: u32, uv_map: Option<String> },
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::MaterialOutput => "MaterialOutput",
            Self::PrincipledBsdf => "PrincipledBsdf",
            Self::VertexColor { .. } => "VertexColor",
            Self::MixRgb { .. } => "MixRgb",
            Self::Math { .. } => "Math",
            Self::SeparateRgb => "SeparateRgb",
            Self::CombineRgb => "CombineRgb",
            Self::ImageTexture { .. } => "ImageTexture",
            Self::Mapping => "Mapping",
            Self::UvMap { .. } => "UvMap",
        }
    }

    pub fn inputs(&self) -> &'static [Socket] {
        use Socket::*;
        match self {
            Self::MaterialOutput => &[Surface],
            Self::PrincipledBsdf => &[BaseColor, Metallic, Roughness],
            Self::VertexColor { .. } | Self::UvMap { .. } => &[],
            Self::MixRgb { .. } => &[Fac, Color1, Color2],
            Self::Math { .. } => &[A, B],
            Self::SeparateRgb => &[Image],
            Self::CombineRgb => &[Red, Green, Blue],
            Self::ImageTexture { .. } | Self::Mapping => &[Vector],
        }
    }

    pub fn outputs(&self) -> &'static [Socket] {
        use Socket::*;
        match self {
            Self::MaterialOutput => &[],
            Self::PrincipledBsdf => &[Bsdf],
            Self::VertexColor { .. } | Self::MixRgb { .. } => &[Color],
            Self::Math { .. } => &[Value],
            Self::SeparateRgb => &[Red, Green, Blue],
            Self::CombineRgb => &[Image],
            Self::ImageTexture { .. } => &[Color, Alpha],
            Self::Mapping => &[Vector],
            Self::UvMap { .. } => &[Uv],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: Option<String>,
    /// Editor layout position.
    pub location: Vec2,
    pub defaults: BTreeMap<Socket, Value>,
}

/// A directed edge from an output socket to an input socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub from: NodeId,
    pub from_socket: Socket,
    pub to: NodeId,
    pub to_socket: Socket,
}

/// A shader node graph with one fixed material output node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShaderGraph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    output: NodeId,
    /// Flat preview colour for the host viewport.
    viewport_color: Option<[f32; 3]>,
    #[serde(skip)]
    next_id: u32,
}

impl Default for ShaderGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderGraph {
    /// A graph holding only the material output node.
    pub fn new() -> Self {
        let output = NodeId(0);
        Self {
            nodes: vec![Node {
                id: output,
                kind: NodeKind::MaterialOutput,
                label: None,
                location: Vec2::new(1250.0, 0.0),
                defaults: BTreeMap::new(),
            }],
            links: Vec::new(),
            output,
            viewport_color: None,
            next_id: 1,
        }
    }

    /// Remove every node except the output, and every link.
    pub fn reset(&mut self) {
        let output = self.output;
        self.nodes.retain(|n| n.id == output);
        self.links.clear();
        self.viewport_color = None;
        self.next_id = output.0 + 1;
    }

    pub fn add_node(&mut self, kind: NodeKind, location: Vec2) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node {
            id,
            kind,
            label: None,
            location,
            defaults: BTreeMap::new(),
        });
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, ShaderError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(ShaderError::NoSuchNode(id))
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<(), ShaderError> {
        self.node_mut(id)?.label = Some(label.into());
        Ok(())
    }

    /// Set the static value of an input socket.
    pub fn set_default(&mut self, id: NodeId, socket: Socket, value: Value) -> Result<(), ShaderError> {
        let node = self.node_mut(id)?;
        if !node.kind.inputs().contains(&socket) {
            return Err(ShaderError::NoSuchInput {
                node: id,
                kind: node.kind.type_name(),
                socket,
            });
        }
        node.defaults.insert(socket, value);
        Ok(())
    }

    /// Connect an output socket to an input socket. An input holds at most
    /// one link; connecting it again replaces the previous link.
    pub fn link(
        &mut self,
        from: NodeId,
        from_socket: Socket,
        to: NodeId,
        to_socket: Socket,
    ) -> Result<(), ShaderError> {
        let source = self.node(from).ok_or(ShaderError::NoSuchNode(from))?;
        if !source.kind.outputs().contains(&from_socket) {
            return Err(ShaderError::NoSuchOutput {
                node: from,
                kind: source.kind.type_name(),
                socket: from_socket,
            });
        }
        let target = self.node(to).ok_or(ShaderError::NoSuchNode(to))?;
        if !target.kind.inputs().contains(&to_socket) {
            return Err(ShaderError::NoSuchInput {
                node: to,
                kind: target.kind.type_name(),
                socket: to_socket,
            });
        }

        self.links
            .retain(|l| !(l.to == to && l.to_socket == to_socket));
        self.links.push(Link {
            from,
            from_socket,
            to,
            to_socket,
        });
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn viewport_color(&self) -> Option<[f32; 3]> {
        self.viewport_color
    }

    pub fn set_viewport_color(&mut self, color: [f32; 3]) {
        self.viewport_color = Some(color);
    }

    /// The link feeding an input socket, if any.
    pub fn source_of(&self, to: NodeId, to_socket: Socket) -> Option<(NodeId, Socket)> {
        self.links
            .iter()
            .find(|l| l.to == to && l.to_socket == to_socket)
            .map(|l| (l.from, l.from_socket))
    }

    /// Static value of an input socket, if set.
    pub fn default_value(&self, id: NodeId, socket: Socket) -> Option<Value> {
        self.node(id).and_then(|n| n.defaults.get(&socket).copied())
    }

    /// Number of nodes whose type name matches.
    pub fn count(&self, type_name: &str) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind.type_name() == type_name)
            .count()
    }

    /// First node of the given type.
    pub fn find(&self, type_name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.kind.type_name() == type_name)
            .map(|n| n.id)
    }

    /// Node type multiset and typed edge multiset, both sorted. Two graphs
    /// with equal signatures have the same node types and the same edges.
    pub fn signature(&self) -> (Vec<&'static str>, Vec<(&'static str, Socket, &'static str, Socket)>) {
        let type_of = |id: NodeId| self.node(id).map_or("?", |n| n.kind.type_name());

        let mut nodes: Vec<&'static str> = self.nodes.iter().map(|n| n.kind.type_name()).collect();
        nodes.sort_unstable();

        let mut edges: Vec<_> = self
            .links
            .iter()
            .map(|l| (type_of(l.from), l.from_socket, type_of(l.to), l.to_socket))
            .collect();
        edges.sort_unstable();

        (nodes, edges)
    }

    pub fn is_isomorphic(&self, other: &ShaderGraph) -> bool {
        self.signature() == other.signature()
    }

    /// Attach UV layer names to every texture coordinate node. Nothing is
    /// changed when any node's set is missing from the mesh.
    pub fn bind_uv_maps(&mut self, bindings: &UvChannelBindings) -> Result<(), ShaderError> {
        for node in &self.nodes {
            if let NodeKind::UvMap { tex_coord, .. } = node.kind {
                if bindings.resolve(tex_coord).is_none() {
                    return Err(ShaderError::MissingUvChannel {
                        channel: tex_coord,
                        available: bindings.len(),
                    });
                }
            }
        }

        for node in &mut self.nodes {
            if let NodeKind::UvMap { tex_coord, uv_map } = &mut node.kind {
                *uv_map = bindings.resolve(*tex_coord).map(str::to_owned);
            }
        }
        Ok(())
    }

    /// Mark image slots whose handle does not resolve as broken. Returns the
    /// handles that were broken.
    pub fn resolve_images(&mut self, is_loaded: impl Fn(ImageHandle) -> bool) -> Vec<ImageHandle> {
        let mut broken = Vec::new();
        for node in &mut self.nodes {
            if let NodeKind::ImageTexture { image, .. } = &mut node.kind {
                let handle = match *image {
                    ImageSlot::Linked(h) | ImageSlot::Broken(h) => h,
                };
                if is_loaded(handle) {
                    *image = ImageSlot::Linked(handle);
                } else {
                    *image = ImageSlot::Broken(handle);
                    broken.push(handle);
                }
            }
        }
        broken
    }
}
