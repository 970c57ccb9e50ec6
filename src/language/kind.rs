use std::fmt;

/// Semantic kind of a parameter or return slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Reference,
    Array(Component),
}

/// Element kind of an array. Arrays of arrays are not modelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Reference,
}

pub const PRIMITIVES: [Kind; 8] = [
    Kind::Boolean,
    Kind::Byte,
    Kind::Short,
    Kind::Char,
    Kind::Int,
    Kind::Long,
    Kind::Float,
    Kind::Double,
];

impl Kind {
    pub fn array_of(component: Component) -> Self {
        Kind::Array(component)
    }

    pub fn component(&self) -> Option<Component> {
        match self {
            Kind::Array(component) => Some(*component),
            _ => None,
        }
    }

    /// The element kind this kind can be stored as inside an array.
    pub fn as_component(&self) -> Option<Component> {
        match self {
            Kind::Boolean => Some(Component::Boolean),
            Kind::Byte => Some(Component::Byte),
            Kind::Short => Some(Component::Short),
            Kind::Char => Some(Component::Char),
            Kind::Int => Some(Component::Int),
            Kind::Long => Some(Component::Long),
            Kind::Float => Some(Component::Float),
            Kind::Double => Some(Component::Double),
            Kind::Reference => Some(Component::Reference),
            Kind::Void | Kind::Array(_) => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Kind::Void)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Kind::Reference | Kind::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        !self.is_void() && !self.is_reference()
    }

    pub fn name(&self) -> String {
        match self {
            Kind::Array(component) => format!("{}[]", component.kind().name()),
            other => other.simple_name().to_string(),
        }
    }

    fn simple_name(&self) -> &'static str {
        match self {
            Kind::Void => "void",
            Kind::Boolean => "boolean",
            Kind::Byte => "byte",
            Kind::Short => "short",
            Kind::Char => "char",
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Reference => "ref",
            Kind::Array(_) => "array",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "void" => Kind::Void,
            "boolean" | "bool" => Kind::Boolean,
            "byte" => Kind::Byte,
            "short" => Kind::Short,
            "char" => Kind::Char,
            "int" => Kind::Int,
            "long" => Kind::Long,
            "float" => Kind::Float,
            "double" => Kind::Double,
            "ref" | "Object" => Kind::Reference,
            _ => return None,
        };
        Some(kind)
    }

    /// JVM-style descriptor fragment, e.g. `I`, `[J`, `Ljava/lang/Object;`.
    pub fn descriptor(&self) -> String {
        match self {
            Kind::Void => "V".into(),
            Kind::Boolean => "Z".into(),
            Kind::Byte => "B".into(),
            Kind::Short => "S".into(),
            Kind::Char => "C".into(),
            Kind::Int => "I".into(),
            Kind::Long => "J".into(),
            Kind::Float => "F".into(),
            Kind::Double => "D".into(),
            Kind::Reference => "Ljava/lang/Object;".into(),
            Kind::Array(component) => format!("[{}", component.kind().descriptor()),
        }
    }
}

impl Component {
    pub fn kind(&self) -> Kind {
        match self {
            Component::Boolean => Kind::Boolean,
            Component::Byte => Kind::Byte,
            Component::Short => Kind::Short,
            Component::Char => Kind::Char,
            Component::Int => Kind::Int,
            Component::Long => Kind::Long,
            Component::Float => Kind::Float,
            Component::Double => Kind::Double,
            Component::Reference => Kind::Reference,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}
