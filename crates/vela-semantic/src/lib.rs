mod constant;
pub use constant::ConstantValue;

mod types;
pub use types::{
    AliasType, ConstantRange, EnumMember, EnumMemberDecl, EnumType, FieldDecl, FloatingKind,
    IntegralFlags, PackedArrayType, PackedStructType, PackedUnionType, PredefinedIntKind,
    ScalarKind, StructField, Type, TypeStore, UnpackedArrayType, UnpackedStructType,
    UnpackedUnionType,
};
