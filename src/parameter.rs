use crate::error::Error;
use crate::parameter_type::ParameterType;
use crate::Value;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ParameterIndex {
    Positional(usize),
    Named(String),
}

impl ParameterIndex {
    pub fn is_named(&self) -> bool {
        matches!(self, ParameterIndex::Named(_))
    }
}

impl From<String> for ParameterIndex {
    fn from(value: String) -> Self {
        ParameterIndex::Named(value)
    }
}

impl From<&str> for ParameterIndex {
    fn from(value: &str) -> Self {
        ParameterIndex::Named(String::from(value))
    }
}

impl From<i32> for ParameterIndex {
    fn from(value: i32) -> Self {
        ParameterIndex::Positional(value as usize)
    }
}

impl From<usize> for ParameterIndex {
    fn from(value: usize) -> Self {
        ParameterIndex::Positional(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub(crate) value: Value,
    pub(crate) value_type: ParameterType,
}

impl Parameter {
    pub fn new(value: Value, param_type: ParameterType) -> Self {
        Parameter {
            value,
            value_type: param_type,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_type(&self) -> ParameterType {
        self.value_type
    }
}

impl From<Value> for Parameter {
    fn from(value: Value) -> Self {
        match value {
            Value::NULL => Parameter::new(value, ParameterType::Null),
            Value::UInt(_) | Value::Int(_) => Parameter::new(value, ParameterType::Integer),
            Value::Float(_) => Parameter::new(value, ParameterType::Float),
            Value::Bytes(_) => Parameter::new(value, ParameterType::Binary),
            Value::Boolean(_) => Parameter::new(value, ParameterType::Boolean),
            _ => Parameter::new(value, ParameterType::String),
        }
    }
}

impl TryFrom<Parameter> for i64 {
    type Error = Error;

    fn try_from(value: Parameter) -> Result<Self, Self::Error> {
        match value.value {
            Value::Int(i) => Ok(i),
            Value::UInt(i) => i64::try_from(i).map_err(|e| e.into()),
            Value::Boolean(b) => Ok(i64::from(b)),
            _ => Err(Error::type_mismatch()),
        }
    }
}

pub trait IntoParameter {
    /// Convert this object into a Parameter object.
    fn into_parameter(self) -> Parameter;
}

impl IntoParameter for Parameter {
    fn into_parameter(self) -> Parameter {
        self
    }
}

impl<T: Into<Value>> IntoParameter for T {
    fn into_parameter(self) -> Parameter {
        Parameter::from(Into::<Value>::into(self))
    }
}

/// Ordered set of parameters bound to one statement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters(Vec<(ParameterIndex, Parameter)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (ParameterIndex, Parameter)> {
        self.0.iter()
    }

    pub fn push<I: Into<ParameterIndex>, P: IntoParameter>(&mut self, index: I, parameter: P) {
        self.0.push((index.into(), parameter.into_parameter()));
    }

    /// Declared types, in declaration order.
    pub fn types(&self) -> Vec<ParameterType> {
        self.0.iter().map(|(_, p)| p.value_type).collect()
    }

    /// Whether parameters are all named.
    ///
    /// Fails if named and positional parameters are mixed.
    pub fn is_named(&self) -> Result<bool, Error> {
        let named = self.0.iter().filter(|(idx, _)| idx.is_named()).count();
        if named == 0 {
            Ok(false)
        } else if named == self.0.len() {
            Ok(true)
        } else {
            Err(Error::mixed_parameters_types())
        }
    }
}

impl FromIterator<(ParameterIndex, Parameter)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (ParameterIndex, Parameter)>>(iter: I) -> Self {
        Parameters(iter.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Parameters {
    fn from(value: Vec<T>) -> Self {
        Parameters(
            value
                .into_iter()
                .enumerate()
                .map(|(idx, value)| {
                    (
                        ParameterIndex::Positional(idx),
                        Parameter::from(Into::<Value>::into(value)),
                    )
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a (ParameterIndex, Parameter);
    type IntoIter = std::slice::Iter<'a, (ParameterIndex, Parameter)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds a [`Parameters`] set.
///
/// `params![]` is the empty set, `params!["a", 2]` binds positionally,
/// `params!["id" => 1, "name" => "foo"]` binds by name.
#[macro_export]
macro_rules! params {
    [] => {
        $crate::Parameters::new()
    };

    [$($idx:expr => $value:expr),+ $(,)?] => {{
        let mut parameters = $crate::Parameters::new();
        $(parameters.push($idx, $value);)+
        parameters
    }};

    [$($value:expr),+ $(,)?] => {{
        let mut parameters = $crate::Parameters::new();
        $(parameters.push(parameters.len(), $value);)+
        parameters
    }};
}
