//! Procedure enum and the procedure registry.
//!
//! Procedures are the instruction set of the executor. Each variant carries
//! its arguments fully typed; [`Procedure::bind`] builds one from a dotted
//! procedure name and positional [`Arg`]s using the signature registry.
//!
//! Procedures are:
//! - **Self-contained**: All arguments needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON
//! - **Mode-tagged**: Every procedure is either READ or WRITE

use serde::{Deserialize, Serialize};
use stratagraph_core::{NodeId, ProcedureMode, RelationshipId, Value};

use crate::types::Arg;
use crate::{Error, Result};

/// Default `timeOutSeconds` for the await procedures
pub const DEFAULT_AWAIT_TIMEOUT_SECONDS: i64 = 300;

/// A procedure call with bound arguments.
///
/// # Procedure Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Tokens | 3 | Labels, property keys and relationship types in use |
/// | Schema | 7 | Index and constraint listing, awaiting, resampling |
/// | Manual index reads | 7 | Seek and search named manual indexes |
/// | Automatic index reads | 4 | Seek and search the automatic indexes |
/// | Manual index management | 10 | Create, check, list, drop, add, remove |
///
/// # Example
///
/// ```ignore
/// use stratagraph_executor::{Procedure, Value};
///
/// let proc = Procedure::ManualSeekNodes {
///     index_name: "actors".into(),
///     key: "name".into(),
///     value: Value::from("Keanu"),
/// };
/// assert_eq!(proc.name(), "db.index.manual.seek.nodes");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Procedure {
    // ==================== Tokens (3) ====================
    /// List all labels in use.
    /// Yields: `LabelResult`
    Labels,

    /// List all property keys in use.
    /// Yields: `PropertyKeyResult`
    PropertyKeys,

    /// List all relationship types in use.
    /// Yields: `RelationshipTypeResult`
    RelationshipTypes,

    // ==================== Schema (7) ====================
    /// List all schema indexes, sorted by description.
    /// Yields: `IndexResult`
    Indexes,

    /// List all constraints, sorted by description.
    /// Yields: `ConstraintResult`
    Constraints,

    /// Build the schema meta-graph.
    /// Yields: one `SchemaGraphResult`
    Schema,

    /// Wait for one index to come online.
    /// Returns: `Output::Unit`
    AwaitIndex { index: String, timeout_seconds: i64 },

    /// Wait for every index to come online.
    /// Returns: `Output::Unit`
    AwaitIndexes { timeout_seconds: i64 },

    /// Schedule resampling of one index.
    /// Returns: `Output::Unit`
    ResampleIndex { index: String },

    /// Schedule resampling of every index updated since its last sample.
    /// Returns: `Output::Unit`
    ResampleOutdatedIndexes,

    // ==================== Manual index reads (7) ====================
    /// Exact lookup in a node manual index.
    /// Yields: `NodeResult`
    ManualSeekNodes {
        index_name: String,
        key: String,
        value: Value,
    },

    /// Scored search in a node manual index.
    /// Yields: `WeightedNodeResult`
    ManualSearchNodes { index_name: String, query: Value },

    /// Exact lookup in a relationship manual index.
    /// Yields: `RelationshipResult`
    ManualSeekRelationships {
        index_name: String,
        key: String,
        value: Value,
    },

    /// Scored search in a relationship manual index.
    /// Yields: `WeightedRelationshipResult`
    ManualSearchRelationships { index_name: String, query: Value },

    /// Scored search restricted to relationships starting at `start`.
    /// Yields: `WeightedRelationshipResult`
    ManualSearchRelationshipsFrom {
        index_name: String,
        start: NodeId,
        query: Value,
    },

    /// Scored search restricted to relationships ending at `end`.
    /// Yields: `WeightedRelationshipResult`
    ManualSearchRelationshipsTo {
        index_name: String,
        end: NodeId,
        query: Value,
    },

    /// Scored search restricted to relationships from `start` to `end`.
    /// Yields: `WeightedRelationshipResult`
    ManualSearchRelationshipsBetween {
        index_name: String,
        start: NodeId,
        end: NodeId,
        query: Value,
    },

    // ==================== Automatic index reads (4) ====================
    /// Exact lookup in the automatic node index.
    /// Yields: `NodeResult` (none if the index was never populated)
    AutoSeekNodes { key: String, value: Value },

    /// Scored search in the automatic node index.
    /// Yields: `WeightedNodeResult`
    AutoSearchNodes { query: Value },

    /// Exact lookup in the automatic relationship index.
    /// Yields: `RelationshipResult`
    AutoSeekRelationships { key: String, value: Value },

    /// Scored search in the automatic relationship index.
    /// Yields: `WeightedRelationshipResult`
    AutoSearchRelationships { query: Value },

    // ==================== Manual index management (10) ====================
    /// Get or create a node manual index.
    /// Yields: one `LegacyIndexInfo`
    ManualForNodes { index_name: String },

    /// Get or create a relationship manual index.
    /// Yields: one `LegacyIndexInfo`
    ManualForRelationships { index_name: String },

    /// Check whether a node manual index exists.
    /// Yields: one `BooleanResult`
    ManualExistsForNodes { index_name: String },

    /// Check whether a relationship manual index exists.
    /// Yields: one `BooleanResult`
    ManualExistsForRelationships { index_name: String },

    /// List every manual index, node indexes first.
    /// Yields: `LegacyIndexInfo`
    ManualList,

    /// Drop the node and/or relationship manual index with this name.
    /// Yields: one `LegacyIndexInfo` per dropped index
    ManualDrop { index_name: String },

    /// Add a node to a manual index under key and value.
    /// Yields: one `BooleanResult`
    ManualAddNode {
        index_name: String,
        node: NodeId,
        key: String,
        value: Value,
    },

    /// Add a relationship to a manual index under key and value.
    /// Yields: one `BooleanResult`
    ManualAddRelationship {
        index_name: String,
        relationship: RelationshipId,
        key: String,
        value: Value,
    },

    /// Remove a node's entries under `key`, or all of them when `None`.
    /// Yields: one `BooleanResult`
    ManualRemoveNode {
        index_name: String,
        node: NodeId,
        #[serde(default)]
        key: Option<String>,
    },

    /// Remove a relationship's entries under `key`, or all of them when `None`.
    /// Yields: one `BooleanResult`
    ManualRemoveRelationship {
        index_name: String,
        relationship: RelationshipId,
        #[serde(default)]
        key: Option<String>,
    },
}

impl Procedure {
    /// Dotted procedure name
    pub fn name(&self) -> &'static str {
        match self {
            Procedure::Labels => "db.labels",
            Procedure::PropertyKeys => "db.propertyKeys",
            Procedure::RelationshipTypes => "db.relationshipTypes",
            Procedure::Indexes => "db.indexes",
            Procedure::Constraints => "db.constraints",
            Procedure::Schema => "db.schema",
            Procedure::AwaitIndex { .. } => "db.awaitIndex",
            Procedure::AwaitIndexes { .. } => "db.awaitIndexes",
            Procedure::ResampleIndex { .. } => "db.resampleIndex",
            Procedure::ResampleOutdatedIndexes => "db.resampleOutdatedIndexes",
            Procedure::ManualSeekNodes { .. } => "db.index.manual.seek.nodes",
            Procedure::ManualSearchNodes { .. } => "db.index.manual.nodes",
            Procedure::ManualSeekRelationships { .. } => "db.index.manual.seek.relationships",
            Procedure::ManualSearchRelationships { .. } => "db.index.manual.relationships",
            Procedure::ManualSearchRelationshipsFrom { .. } => "db.index.manual.in",
            Procedure::ManualSearchRelationshipsTo { .. } => "db.index.manual.out",
            Procedure::ManualSearchRelationshipsBetween { .. } => "db.index.manual.between",
            Procedure::AutoSeekNodes { .. } => "db.index.auto.seek.nodes",
            Procedure::AutoSearchNodes { .. } => "db.index.auto.nodes",
            Procedure::AutoSeekRelationships { .. } => "db.index.auto.seek.relationships",
            Procedure::AutoSearchRelationships { .. } => "db.index.auto.relationships",
            Procedure::ManualForNodes { .. } => "db.index.manual.forNodes",
            Procedure::ManualForRelationships { .. } => "db.index.manual.forRelationships",
            Procedure::ManualExistsForNodes { .. } => "db.index.manual.exists.forNodes",
            Procedure::ManualExistsForRelationships { .. } => {
                "db.index.manual.exists.forRelationships"
            }
            Procedure::ManualList => "db.index.manual.list",
            Procedure::ManualDrop { .. } => "db.index.manual.drop",
            Procedure::ManualAddNode { .. } => "db.index.manual.add.node",
            Procedure::ManualAddRelationship { .. } => "db.index.manual.add.relationship",
            Procedure::ManualRemoveNode { .. } => "db.index.manual.remove.node",
            Procedure::ManualRemoveRelationship { .. } => "db.index.manual.remove.relationship",
        }
    }

    /// Declared effect class
    pub fn mode(&self) -> ProcedureMode {
        match self {
            Procedure::ManualForNodes { .. }
            | Procedure::ManualForRelationships { .. }
            | Procedure::ManualDrop { .. }
            | Procedure::ManualAddNode { .. }
            | Procedure::ManualAddRelationship { .. }
            | Procedure::ManualRemoveNode { .. }
            | Procedure::ManualRemoveRelationship { .. } => ProcedureMode::Write,
            _ => ProcedureMode::Read,
        }
    }

    /// Bind positional arguments to the procedure registered under `name`.
    ///
    /// Missing trailing arguments take their parameter default.
    ///
    /// # Errors
    ///
    /// - `ProcedureNotFound` if no procedure has this name
    /// - `InvalidArgument` if too few or too many arguments are given
    /// - `WrongArgumentType` if an argument does not fit its parameter
    pub fn bind(name: &str, args: Vec<Arg>) -> Result<Procedure> {
        let signature = signature(name).ok_or_else(|| Error::ProcedureNotFound {
            name: name.to_string(),
        })?;
        let mut args = Arguments::bind(signature, args)?;

        let procedure = match signature.name {
            "db.labels" => Procedure::Labels,
            "db.propertyKeys" => Procedure::PropertyKeys,
            "db.relationshipTypes" => Procedure::RelationshipTypes,
            "db.indexes" => Procedure::Indexes,
            "db.constraints" => Procedure::Constraints,
            "db.schema" => Procedure::Schema,
            "db.awaitIndex" => Procedure::AwaitIndex {
                index: args.string()?,
                timeout_seconds: args.integer()?,
            },
            "db.awaitIndexes" => Procedure::AwaitIndexes {
                timeout_seconds: args.integer()?,
            },
            "db.resampleIndex" => Procedure::ResampleIndex {
                index: args.string()?,
            },
            "db.resampleOutdatedIndexes" => Procedure::ResampleOutdatedIndexes,
            "db.index.manual.seek.nodes" => Procedure::ManualSeekNodes {
                index_name: args.string()?,
                key: args.string()?,
                value: args.value()?,
            },
            "db.index.manual.nodes" => Procedure::ManualSearchNodes {
                index_name: args.string()?,
                query: args.value()?,
            },
            "db.index.manual.seek.relationships" => Procedure::ManualSeekRelationships {
                index_name: args.string()?,
                key: args.string()?,
                value: args.value()?,
            },
            "db.index.manual.relationships" => Procedure::ManualSearchRelationships {
                index_name: args.string()?,
                query: args.value()?,
            },
            "db.index.manual.in" => Procedure::ManualSearchRelationshipsFrom {
                index_name: args.string()?,
                start: args.node()?,
                query: args.value()?,
            },
            "db.index.manual.out" => Procedure::ManualSearchRelationshipsTo {
                index_name: args.string()?,
                end: args.node()?,
                query: args.value()?,
            },
            "db.index.manual.between" => Procedure::ManualSearchRelationshipsBetween {
                index_name: args.string()?,
                start: args.node()?,
                end: args.node()?,
                query: args.value()?,
            },
            "db.index.auto.seek.nodes" => Procedure::AutoSeekNodes {
                key: args.string()?,
                value: args.value()?,
            },
            "db.index.auto.nodes" => Procedure::AutoSearchNodes {
                query: args.value()?,
            },
            "db.index.auto.seek.relationships" => Procedure::AutoSeekRelationships {
                key: args.string()?,
                value: args.value()?,
            },
            "db.index.auto.relationships" => Procedure::AutoSearchRelationships {
                query: args.value()?,
            },
            "db.index.manual.forNodes" => Procedure::ManualForNodes {
                index_name: args.string()?,
            },
            "db.index.manual.forRelationships" => Procedure::ManualForRelationships {
                index_name: args.string()?,
            },
            "db.index.manual.exists.forNodes" => Procedure::ManualExistsForNodes {
                index_name: args.string()?,
            },
            "db.index.manual.exists.forRelationships" => Procedure::ManualExistsForRelationships {
                index_name: args.string()?,
            },
            "db.index.manual.list" => Procedure::ManualList,
            "db.index.manual.drop" => Procedure::ManualDrop {
                index_name: args.string()?,
            },
            "db.index.manual.add.node" => Procedure::ManualAddNode {
                index_name: args.string()?,
                node: args.node()?,
                key: args.string()?,
                value: args.value()?,
            },
            "db.index.manual.add.relationship" => Procedure::ManualAddRelationship {
                index_name: args.string()?,
                relationship: args.relationship()?,
                key: args.string()?,
                value: args.value()?,
            },
            "db.index.manual.remove.node" => Procedure::ManualRemoveNode {
                index_name: args.string()?,
                node: args.node()?,
                key: args.optional_string()?,
            },
            "db.index.manual.remove.relationship" => Procedure::ManualRemoveRelationship {
                index_name: args.string()?,
                relationship: args.relationship()?,
                key: args.optional_string()?,
            },
            other => {
                return Err(Error::Internal {
                    reason: format!("signature {} has no binding", other),
                })
            }
        };
        Ok(procedure)
    }
}

// =============================================================================
// Signatures
// =============================================================================

/// Declared type of a procedure parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterType {
    /// Text
    String,
    /// 64-bit integer
    Integer,
    /// Any plain value
    Any,
    /// Node reference
    Node,
    /// Relationship reference
    Relationship,
}

impl ParameterType {
    /// Upper-case type name (`STRING`, `INTEGER`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "STRING",
            ParameterType::Integer => "INTEGER",
            ParameterType::Any => "ANY",
            ParameterType::Node => "NODE",
            ParameterType::Relationship => "RELATIONSHIP",
        }
    }
}

/// Value a parameter takes when its argument is omitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterDefault {
    /// Integer default
    Int(i64),
    /// Null; the parameter is optional
    Null,
}

impl ParameterDefault {
    fn to_arg(self) -> Arg {
        match self {
            ParameterDefault::Int(i) => Arg::Value(Value::Int(i)),
            ParameterDefault::Null => Arg::Value(Value::Null),
        }
    }
}

/// One positional parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: &'static str,
    /// Declared type
    #[serde(rename = "type")]
    pub kind: ParameterType,
    /// Default when omitted; `None` means required
    pub default: Option<ParameterDefault>,
}

/// Name, parameters, mode and description of a procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcedureSignature {
    /// Dotted procedure name
    pub name: &'static str,
    /// Ordered parameters
    pub parameters: &'static [Parameter],
    /// Declared effect class
    pub mode: ProcedureMode,
    /// Human-readable description
    pub description: &'static str,
}

impl ProcedureSignature {
    /// Number of parameters without a default
    pub fn required_arity(&self) -> usize {
        self.parameters.iter().filter(|p| p.default.is_none()).count()
    }
}

const fn param(name: &'static str, kind: ParameterType) -> Parameter {
    Parameter {
        name,
        kind,
        default: None,
    }
}

const fn optional(name: &'static str, kind: ParameterType, default: ParameterDefault) -> Parameter {
    Parameter {
        name,
        kind,
        default: Some(default),
    }
}

const fn read(
    name: &'static str,
    parameters: &'static [Parameter],
    description: &'static str,
) -> ProcedureSignature {
    ProcedureSignature {
        name,
        parameters,
        mode: ProcedureMode::Read,
        description,
    }
}

const fn write(
    name: &'static str,
    parameters: &'static [Parameter],
    description: &'static str,
) -> ProcedureSignature {
    ProcedureSignature {
        name,
        parameters,
        mode: ProcedureMode::Write,
        description,
    }
}

use ParameterType::{Any, Integer, Node as NodeParam, Relationship as RelParam, String as Str};

const INDEX_NAME: Parameter = param("indexName", Str);
const TIMEOUT: Parameter = optional(
    "timeOutSeconds",
    Integer,
    ParameterDefault::Int(DEFAULT_AWAIT_TIMEOUT_SECONDS),
);
const OPTIONAL_KEY: Parameter = optional("key", Str, ParameterDefault::Null);

// Parameter lists, shared between procedures with the same shape
const NO_PARAMS: &[Parameter] = &[];
const AWAIT_INDEX: &[Parameter] = &[param("index", Str), TIMEOUT];
const AWAIT_INDEXES: &[Parameter] = &[TIMEOUT];
const INDEX_SPECIFIER: &[Parameter] = &[param("index", Str)];
const NAMED: &[Parameter] = &[INDEX_NAME];
const MANUAL_SEEK: &[Parameter] = &[INDEX_NAME, param("key", Str), param("value", Any)];
const MANUAL_SEARCH: &[Parameter] = &[INDEX_NAME, param("query", Any)];
const MANUAL_IN: &[Parameter] = &[INDEX_NAME, param("in", NodeParam), param("query", Any)];
const MANUAL_OUT: &[Parameter] = &[INDEX_NAME, param("out", NodeParam), param("query", Any)];
const MANUAL_BETWEEN: &[Parameter] = &[
    INDEX_NAME,
    param("in", NodeParam),
    param("out", NodeParam),
    param("query", Any),
];
const AUTO_SEEK: &[Parameter] = &[param("key", Str), param("value", Any)];
const AUTO_SEARCH: &[Parameter] = &[param("query", Any)];
const ADD_NODE: &[Parameter] = &[
    INDEX_NAME,
    param("node", NodeParam),
    param("key", Str),
    param("value", Any),
];
const ADD_RELATIONSHIP: &[Parameter] = &[
    INDEX_NAME,
    param("relationship", RelParam),
    param("key", Str),
    param("value", Any),
];
const REMOVE_NODE: &[Parameter] = &[INDEX_NAME, param("node", NodeParam), OPTIONAL_KEY];
const REMOVE_RELATIONSHIP: &[Parameter] =
    &[INDEX_NAME, param("relationship", RelParam), OPTIONAL_KEY];

static SIGNATURES: &[ProcedureSignature] = &[
    read("db.labels", NO_PARAMS, "List all labels in the database."),
    read("db.propertyKeys", NO_PARAMS, "List all property keys in the database."),
    read("db.relationshipTypes", NO_PARAMS, "List all relationship types in the database."),
    read("db.indexes", NO_PARAMS, "List all indexes in the database."),
    read("db.constraints", NO_PARAMS, "List all constraints in the database."),
    read("db.schema", NO_PARAMS, "Show the schema of the data."),
    read(
        "db.awaitIndex",
        AWAIT_INDEX,
        "Wait for an index to come online (for example: CALL db.awaitIndex(\":Person(name)\")).",
    ),
    read(
        "db.awaitIndexes",
        AWAIT_INDEXES,
        "Wait for all indexes to come online (for example: CALL db.awaitIndexes(\"500\")).",
    ),
    read(
        "db.resampleIndex",
        INDEX_SPECIFIER,
        "Schedule resampling of an index (for example: CALL db.resampleIndex(\":Person(name)\")).",
    ),
    read(
        "db.resampleOutdatedIndexes",
        NO_PARAMS,
        "Schedule resampling of all outdated indexes.",
    ),
    read(
        "db.index.manual.seek.nodes",
        MANUAL_SEEK,
        "Get node from manual index. Replaces `START n=node:nodes(key = 'A')`",
    ),
    read(
        "db.index.manual.nodes",
        MANUAL_SEARCH,
        "Search nodes in manual index. Replaces `START n=node:nodes('key:foo*')`",
    ),
    read(
        "db.index.manual.seek.relationships",
        MANUAL_SEEK,
        "Get relationship from manual index. Replaces `START r=relationship:relIndex(key = 'A')`",
    ),
    read(
        "db.index.manual.relationships",
        MANUAL_SEARCH,
        "Search relationship in manual index. Replaces `START r=relationship:relIndex('key:foo*')`",
    ),
    read(
        "db.index.manual.in",
        MANUAL_IN,
        "Search relationship from manual index, starting at the node 'in'.",
    ),
    read(
        "db.index.manual.out",
        MANUAL_OUT,
        "Search relationship from manual index, ending at the node 'out'.",
    ),
    read(
        "db.index.manual.between",
        MANUAL_BETWEEN,
        "Search relationship from manual index, starting at the node 'in' and ending at 'out'.",
    ),
    read(
        "db.index.auto.seek.nodes",
        AUTO_SEEK,
        "Get node from automatic index. Replaces `START n=node:node_auto_index(key = 'A')`",
    ),
    read(
        "db.index.auto.nodes",
        AUTO_SEARCH,
        "Search nodes in automatic index. Replaces `START n=node:node_auto_index('key:foo*')`",
    ),
    read(
        "db.index.auto.seek.relationships",
        AUTO_SEEK,
        "Get relationship from automatic index. Replaces `START r=relationship:relationship_auto_index(key = 'A')`",
    ),
    read(
        "db.index.auto.relationships",
        AUTO_SEARCH,
        "Search relationship in automatic index. Replaces `START r=relationship:relationship_auto_index('key:foo*')`",
    ),
    write(
        "db.index.manual.forNodes",
        NAMED,
        "Get or create a node manual index - YIELD type,name,config",
    ),
    write(
        "db.index.manual.forRelationships",
        NAMED,
        "Get or create a relationship manual index - YIELD type,name,config",
    ),
    read(
        "db.index.manual.exists.forNodes",
        NAMED,
        "Check if a node manual index exists",
    ),
    read(
        "db.index.manual.exists.forRelationships",
        NAMED,
        "Check if a relationship manual index exists",
    ),
    read(
        "db.index.manual.list",
        NO_PARAMS,
        "List all manual indexes - YIELD type,name,config",
    ),
    write(
        "db.index.manual.drop",
        NAMED,
        "Remove a manual index - YIELD type,name,config",
    ),
    write(
        "db.index.manual.add.node",
        ADD_NODE,
        "Add a node to a manual index based on a specified key and value",
    ),
    write(
        "db.index.manual.add.relationship",
        ADD_RELATIONSHIP,
        "Add a relationship to a manual index based on a specified key and value",
    ),
    write(
        "db.index.manual.remove.node",
        REMOVE_NODE,
        "Remove a node from a manual index with an optional key",
    ),
    write(
        "db.index.manual.remove.relationship",
        REMOVE_RELATIONSHIP,
        "Remove a relationship from a manual index with an optional key",
    ),
];

/// Every registered procedure, in registration order
pub fn signatures() -> &'static [ProcedureSignature] {
    SIGNATURES
}

/// Look up a procedure by its dotted name
pub fn signature(name: &str) -> Option<&'static ProcedureSignature> {
    SIGNATURES.iter().find(|s| s.name == name)
}

// =============================================================================
// Argument binding
// =============================================================================

/// Positional arguments paired with their parameters, consumed in order
struct Arguments {
    procedure: &'static str,
    bound: std::vec::IntoIter<(&'static Parameter, Arg)>,
}

impl Arguments {
    fn bind(signature: &'static ProcedureSignature, args: Vec<Arg>) -> Result<Self> {
        let params = signature.parameters;
        let arity_error = |given: usize| {
            let required = signature.required_arity();
            let expected = if required == params.len() {
                format!("{}", required)
            } else {
                format!("{} to {}", required, params.len())
            };
            Error::InvalidArgument {
                reason: format!(
                    "Procedure {} expects {} argument(s), got {}",
                    signature.name, expected, given
                ),
            }
        };

        let given = args.len();
        if given > params.len() {
            return Err(arity_error(given));
        }
        let mut supplied = args.into_iter();
        let mut bound = Vec::with_capacity(params.len());
        for parameter in params {
            let arg = match (supplied.next(), parameter.default) {
                (Some(arg), _) => arg,
                (None, Some(default)) => default.to_arg(),
                (None, None) => return Err(arity_error(given)),
            };
            bound.push((parameter, arg));
        }
        Ok(Arguments {
            procedure: signature.name,
            bound: bound.into_iter(),
        })
    }

    fn next(&mut self) -> Result<(&'static Parameter, Arg)> {
        self.bound.next().ok_or_else(|| Error::Internal {
            reason: format!("{} bound fewer arguments than it reads", self.procedure),
        })
    }

    fn mismatch(parameter: &Parameter, arg: &Arg) -> Error {
        Error::WrongArgumentType {
            parameter: parameter.name.to_string(),
            expected: parameter.kind.as_str().to_string(),
            actual: arg.type_name().to_string(),
        }
    }

    fn string(&mut self) -> Result<String> {
        match self.next()? {
            (_, Arg::Value(Value::String(s))) => Ok(s),
            (parameter, arg) => Err(Self::mismatch(parameter, &arg)),
        }
    }

    fn optional_string(&mut self) -> Result<Option<String>> {
        match self.next()? {
            (_, Arg::Value(Value::String(s))) => Ok(Some(s)),
            (_, Arg::Value(Value::Null)) => Ok(None),
            (parameter, arg) => Err(Self::mismatch(parameter, &arg)),
        }
    }

    fn integer(&mut self) -> Result<i64> {
        match self.next()? {
            (_, Arg::Value(Value::Int(i))) => Ok(i),
            (parameter, arg) => Err(Self::mismatch(parameter, &arg)),
        }
    }

    fn value(&mut self) -> Result<Value> {
        match self.next()? {
            (_, Arg::Value(value)) => Ok(value),
            (parameter, arg) => Err(Self::mismatch(parameter, &arg)),
        }
    }

    fn node(&mut self) -> Result<NodeId> {
        match self.next()? {
            (_, Arg::Node(id)) => Ok(id),
            (parameter, arg) => Err(Self::mismatch(parameter, &arg)),
        }
    }

    fn relationship(&mut self) -> Result<RelationshipId> {
        match self.next()? {
            (_, Arg::Relationship(id)) => Ok(id),
            (parameter, arg) => Err(Self::mismatch(parameter, &arg)),
        }
    }
}
