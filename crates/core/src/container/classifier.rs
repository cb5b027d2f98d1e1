use crate::reflect::{Operand, Type, TypeKind};

/// Result of classifying an abstraction argument
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A capability contract, keyed by the contract's name
    Contract(Type),
    /// A record type, keyed by the record's name
    Record(Type),
    /// Neither; Bind and Resolve reject it
    Invalid,
}

impl Shape {
    /// Registry key for this abstraction
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Shape::Contract(ty) | Shape::Record(ty) => Some(ty.name()),
            Shape::Invalid => None,
        }
    }
}

/// Classify an operand, trying the contract interpretation before the record one
pub fn classify(operand: &Operand) -> Shape {
    let ty = operand.ty();
    if let Some(contract) = contract_of(ty) {
        return Shape::Contract(contract.clone());
    }
    if let Some(record) = record_of(ty) {
        return Shape::Record(record.clone());
    }
    Shape::Invalid
}

/// The contract `ty` denotes, after stripping references
pub fn contract_of(ty: &Type) -> Option<&Type> {
    let base = ty.strip_references();
    (base.kind() == TypeKind::Contract).then_some(base)
}

/// The record `ty` denotes, after stripping references
pub fn record_of(ty: &Type) -> Option<&Type> {
    let base = ty.strip_references();
    (base.kind() == TypeKind::Record).then_some(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Factory;
    use crate::reflect::{DynError, Value};
    use std::sync::Arc;

    #[test]
    fn test_contract_type_handle() {
        let shape = classify(&Operand::from(Type::of::<DynError>()));
        assert_eq!(shape, Shape::Contract(Type::of::<DynError>()));
        assert_eq!(shape.key(), Some(Type::of::<DynError>().name()));
    }

    #[test]
    fn test_references_to_contract_are_contracts() {
        let shape = classify(&Operand::from(Type::of::<Arc<Arc<DynError>>>()));
        assert_eq!(shape, Shape::Contract(Type::of::<DynError>()));
    }

    #[test]
    fn test_scalars_and_callables_are_invalid() {
        assert_eq!(
            classify(&Operand::from(Value::of("string"))),
            Shape::Invalid
        );
        assert_eq!(
            classify(&Operand::from(Type::of::<Arc<u64>>())),
            Shape::Invalid
        );
        let factory = Factory::new(|| Arc::new(1u8));
        assert_eq!(classify(&Operand::from(factory)), Shape::Invalid);
        assert_eq!(Shape::Invalid.key(), None);
    }
}
