/// Binding type of a statement parameter.
///
/// The `*Array` variants mark a list of scalars bound to a single
/// placeholder and expanded by the driver.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParameterType {
    Null = 0,
    Integer = 1,
    String = 2,
    LargeObject = 3,
    Float = 4,
    Boolean = 5,
    Binary = 16,
    Ascii = 17,

    IntegerArray = 101,
    StringArray = 102,
    AsciiArray = 117,
    BinaryArray = 118,
}

impl ParameterType {
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            ParameterType::IntegerArray
                | ParameterType::StringArray
                | ParameterType::AsciiArray
                | ParameterType::BinaryArray
        )
    }
}
