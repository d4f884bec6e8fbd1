use std::cell::RefCell;
use std::collections::HashMap;

use smallvec::SmallVec;
use smol_str::SmolStr;
use vela_arena::Arena;
use vela_diag::{Diagnostic, DiagnosticCode, Diagnostics};
use vela_lexer::BitVector;
use vela_source::SourceLocation;

use crate::constant::ConstantValue;


/// `[msb:lsb]` bounds of one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantRange {
    pub msb: i32,
    pub lsb: i32,
}

impl ConstantRange {
    pub fn new(msb: i32, lsb: i32) -> Self {
        Self { msb, lsb }
    }

    /// `|msb - lsb| + 1`, widened so extreme bounds cannot overflow.
    pub fn width(&self) -> u32 {
        let diff = (i64::from(self.msb) - i64::from(self.lsb)).unsigned_abs() + 1;
        u32::try_from(diff).unwrap_or(u32::MAX)
    }
}

/// The predefined integer types, with fixed width/signedness/state rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedIntKind {
    Byte,
    ShortInt,
    Int,
    LongInt,
    Integer,
    Time,
}

impl PredefinedIntKind {
    pub fn width(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::ShortInt => 16,
            Self::Int | Self::Integer => 32,
            Self::LongInt | Self::Time => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        !matches!(self, Self::Time)
    }

    pub fn is_four_state(self) -> bool {
        matches!(self, Self::Integer | Self::Time)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::ShortInt => "shortint",
            Self::Int => "int",
            Self::LongInt => "longint",
            Self::Integer => "integer",
            Self::Time => "time",
        }
    }
}

/// Single-bit type keywords. `bit` is two-state; `logic` and `reg` are
/// four-state synonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bit,
    Logic,
    Reg,
}

impl ScalarKind {
    pub fn is_four_state(self) -> bool {
        !matches!(self, Self::Bit)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::Logic => "logic",
            Self::Reg => "reg",
        }
    }
}

/// Floating-point type keywords. `real` and `realtime` are synonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatingKind {
    Real,
    ShortReal,
    RealTime,
}

impl FloatingKind {
    pub fn width(self) -> u32 {
        match self {
            Self::ShortReal => 32,
            Self::Real | Self::RealTime => 64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::ShortReal => "shortreal",
            Self::RealTime => "realtime",
        }
    }
}

/// Signedness/state/reg-ness of an integral type, used as part of the
/// shared-vector cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntegralFlags {
    pub signed: bool,
    pub four_state: bool,
    pub reg: bool,
}

impl IntegralFlags {
    fn scalar_kind(self) -> ScalarKind {
        if self.reg {
            ScalarKind::Reg
        } else if self.four_state {
            ScalarKind::Logic
        } else {
            ScalarKind::Bit
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: SmolStr,
    pub value: BitVector,
}

#[derive(Debug)]
pub struct EnumType<'a> {
    pub base: &'a Type<'a>,
    pub members: Vec<EnumMember>,
}

#[derive(Debug)]
pub struct PackedArrayType<'a> {
    pub element: &'a Type<'a>,
    pub range: ConstantRange,
}

#[derive(Debug)]
pub struct UnpackedArrayType<'a> {
    pub element: &'a Type<'a>,
    pub range: ConstantRange,
}

/// One member of a struct or union. For packed structs `offset` is the
/// bit offset of the field's LSB; for unpacked aggregates it is the
/// sequential field index.
#[derive(Debug)]
pub struct StructField<'a> {
    pub name: SmolStr,
    pub ty: &'a Type<'a>,
    pub offset: u32,
    pub location: SourceLocation,
}

#[derive(Debug)]
pub struct PackedStructType<'a> {
    pub width: u32,
    pub signed: bool,
    pub four_state: bool,
    pub fields: Vec<StructField<'a>>,
}

#[derive(Debug)]
pub struct UnpackedStructType<'a> {
    pub fields: Vec<StructField<'a>>,
}

#[derive(Debug)]
pub struct PackedUnionType<'a> {
    pub width: u32,
    pub signed: bool,
    pub four_state: bool,
    pub fields: Vec<StructField<'a>>,
}

#[derive(Debug)]
pub struct UnpackedUnionType<'a> {
    pub fields: Vec<StructField<'a>>,
}

#[derive(Debug)]
pub struct AliasType<'a> {
    pub name: SmolStr,
    pub target: &'a Type<'a>,
}

/// A node in the type lattice. Nodes are immutable and live in the
/// compilation arena; built-ins and shared simple vectors are uniquified,
/// so matching on those reduces to pointer identity.
#[derive(Debug)]
pub enum Type<'a> {
    PredefinedInt(PredefinedIntKind),
    Scalar { kind: ScalarKind, signed: bool },
    Floating(FloatingKind),
    Enum(EnumType<'a>),
    PackedArray(PackedArrayType<'a>),
    UnpackedArray(UnpackedArrayType<'a>),
    PackedStruct(PackedStructType<'a>),
    UnpackedStruct(UnpackedStructType<'a>),
    PackedUnion(PackedUnionType<'a>),
    UnpackedUnion(UnpackedUnionType<'a>),
    Alias(AliasType<'a>),
    CHandle,
    String,
    Event,
    Null,
    Void,
    Error,
}

impl<'a> Type<'a> {
    /// Strips aliases to a fixed point. Every relation predicate operates
    /// on this projection.
    pub fn canonical(&self) -> &Type<'a> {
        let mut ty = self;
        while let Type::Alias(alias) = ty {
            ty = alias.target;
        }
        ty
    }

    pub fn bit_width(&self) -> u32 {
        match self.canonical() {
            Type::PredefinedInt(k) => k.width(),
            Type::Scalar { .. } => 1,
            Type::Floating(k) => k.width(),
            Type::Enum(e) => e.base.bit_width(),
            Type::PackedArray(a) => a.element.bit_width().saturating_mul(a.range.width()),
            Type::PackedStruct(s) => s.width,
            Type::PackedUnion(u) => u.width,
            _ => 0,
        }
    }

    pub fn is_signed(&self) -> bool {
        match self.canonical() {
            Type::PredefinedInt(k) => k.is_signed(),
            Type::Scalar { signed, .. } => *signed,
            Type::Enum(e) => e.base.is_signed(),
            Type::PackedArray(a) => a.element.is_signed(),
            Type::PackedStruct(s) => s.signed,
            Type::PackedUnion(u) => u.signed,
            _ => false,
        }
    }

    pub fn is_four_state(&self) -> bool {
        match self.canonical() {
            Type::PredefinedInt(k) => k.is_four_state(),
            Type::Scalar { kind, .. } => kind.is_four_state(),
            Type::Enum(e) => e.base.is_four_state(),
            Type::PackedArray(a) => a.element.is_four_state(),
            Type::PackedStruct(s) => s.four_state,
            Type::PackedUnion(u) => u.four_state,
            Type::UnpackedArray(a) => a.element.is_four_state(),
            Type::UnpackedStruct(s) => s.fields.iter().any(|f| f.ty.is_four_state()),
            Type::UnpackedUnion(u) => u.fields.iter().any(|f| f.ty.is_four_state()),
            _ => false,
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self.canonical(),
            Type::PredefinedInt(_)
                | Type::Scalar { .. }
                | Type::Enum(_)
                | Type::PackedArray(_)
                | Type::PackedStruct(_)
                | Type::PackedUnion(_)
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.canonical(), Type::Floating(_))
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integral() || self.is_floating()
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.canonical(), Type::Enum(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.canonical(), Type::Error)
    }

    pub fn is_predefined_integer(&self) -> bool {
        matches!(self.canonical(), Type::PredefinedInt(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.canonical(), Type::Scalar { .. })
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self.canonical(),
            Type::UnpackedArray(_) | Type::UnpackedStruct(_) | Type::UnpackedUnion(_)
        )
    }

    /// Predefined integers, scalars, and packed arrays of scalars admit
    /// the shared-vector representation.
    pub fn is_simple_bit_vector(&self) -> bool {
        match self.canonical() {
            Type::PredefinedInt(_) | Type::Scalar { .. } => true,
            Type::PackedArray(a) => a.element.is_scalar(),
            _ => false,
        }
    }

    /// The `[msb:lsb]` range of an integral type's packed representation.
    pub fn bit_vector_range(&self) -> Option<ConstantRange> {
        match self.canonical() {
            Type::PredefinedInt(_)
            | Type::Scalar { .. }
            | Type::PackedStruct(_)
            | Type::PackedUnion(_)
            | Type::Enum(_) => Some(ConstantRange::new(self.bit_width() as i32 - 1, 0)),
            Type::PackedArray(a) => Some(a.range),
            _ => None,
        }
    }

    /// Whether the innermost scalar under any packed arrays is `reg`.
    pub fn is_declared_reg(&self) -> bool {
        let mut ty = self.canonical();
        while let Type::PackedArray(a) = ty {
            ty = a.element.canonical();
        }
        matches!(ty, Type::Scalar { kind: ScalarKind::Reg, .. })
    }

    /// Bit-exact type identity (matching).
    pub fn is_matching(&self, rhs: &Type<'a>) -> bool {
        let l = self.canonical();
        let r = rhs.canonical();

        // Built-ins and cached simple vectors are uniquified, so pointer
        // identity covers the common path.
        if std::ptr::eq(l, r) {
            return true;
        }

        // logic and reg are matching synonyms; bit stays distinct.
        if let (Type::Scalar { kind: lk, .. }, Type::Scalar { kind: rk, .. }) = (l, r) {
            return lk.is_four_state() && rk.is_four_state();
        }

        // real and realtime are matching synonyms.
        if let (Type::Floating(lf), Type::Floating(rf)) = (l, r) {
            return matches!(lf, FloatingKind::Real | FloatingKind::RealTime)
                && matches!(rf, FloatingKind::Real | FloatingKind::RealTime);
        }

        if l.is_simple_bit_vector()
            && r.is_simple_bit_vector()
            && !(l.is_predefined_integer() && r.is_predefined_integer())
        {
            return l.is_signed() == r.is_signed()
                && l.is_four_state() == r.is_four_state()
                && l.bit_vector_range() == r.bit_vector_range();
        }

        match (l, r) {
            (Type::PackedArray(la), Type::PackedArray(ra)) => {
                la.range == ra.range && la.element.is_matching(ra.element)
            }
            (Type::UnpackedArray(la), Type::UnpackedArray(ra)) => {
                la.range == ra.range && la.element.is_matching(ra.element)
            }
            _ => false,
        }
    }

    pub fn is_equivalent(&self, rhs: &Type<'a>) -> bool {
        let l = self.canonical();
        let r = rhs.canonical();
        if l.is_matching(r) {
            return true;
        }

        if l.is_integral() && r.is_integral() && !l.is_enum() && !r.is_enum() {
            return l.is_signed() == r.is_signed()
                && l.is_four_state() == r.is_four_state()
                && l.bit_width() == r.bit_width();
        }

        if let (Type::UnpackedArray(la), Type::UnpackedArray(ra)) = (l, r) {
            return la.range.width() == ra.range.width() && la.element.is_equivalent(ra.element);
        }

        false
    }

    /// Whether a value of `rhs` may be assigned to this type.
    pub fn is_assignment_compatible(&self, rhs: &Type<'a>) -> bool {
        let l = self.canonical();
        let r = rhs.canonical();
        if l.is_equivalent(r) {
            return true;
        }
        if (l.is_integral() && !l.is_enum()) || l.is_floating() {
            return r.is_integral() || r.is_floating();
        }
        false
    }

    pub fn is_cast_compatible(&self, rhs: &Type<'a>) -> bool {
        let l = self.canonical();
        let r = rhs.canonical();
        if l.is_assignment_compatible(r) {
            return true;
        }
        if l.is_enum() {
            return r.is_integral() || r.is_floating();
        }
        false
    }

    /// The value a variable of this type takes before any assignment.
    pub fn default_value(&self) -> ConstantValue {
        match self.canonical() {
            Type::Enum(e) => e.base.default_value(),
            t if t.is_integral() => {
                let width = t.bit_width().max(1);
                if t.is_four_state() {
                    ConstantValue::Integer(BitVector::filled_x(width, t.is_signed()))
                } else {
                    ConstantValue::Integer(BitVector::zero(width, t.is_signed()))
                }
            }
            Type::Floating(_) => ConstantValue::Real(0.0),
            Type::String => ConstantValue::Str(SmolStr::default()),
            Type::UnpackedArray(a) => {
                let elem = a.element.default_value();
                ConstantValue::Elements(vec![elem; a.range.width() as usize])
            }
            Type::UnpackedStruct(s) => {
                ConstantValue::Elements(s.fields.iter().map(|f| f.ty.default_value()).collect())
            }
            Type::UnpackedUnion(u) => ConstantValue::Elements(
                u.fields.iter().take(1).map(|f| f.ty.default_value()).collect(),
            ),
            _ => ConstantValue::Null,
        }
    }

    /// Human-readable rendering for diagnostics.
    pub fn pretty(&self) -> SmolStr {
        match self {
            Type::PredefinedInt(k) => SmolStr::new_static(k.name()),
            Type::Scalar { kind, signed } => {
                if *signed {
                    SmolStr::new(format!("{} signed", kind.name()))
                } else {
                    SmolStr::new_static(kind.name())
                }
            }
            Type::Floating(k) => SmolStr::new_static(k.name()),
            Type::Enum(_) => SmolStr::new_static("enum"),
            Type::PackedArray(a) => SmolStr::new(format!(
                "{} [{}:{}]",
                a.element.pretty(),
                a.range.msb,
                a.range.lsb
            )),
            Type::UnpackedArray(a) => SmolStr::new(format!(
                "{}$[{}:{}]",
                a.element.pretty(),
                a.range.msb,
                a.range.lsb
            )),
            Type::PackedStruct(_) => SmolStr::new_static("struct packed"),
            Type::UnpackedStruct(_) => SmolStr::new_static("struct"),
            Type::PackedUnion(_) => SmolStr::new_static("union packed"),
            Type::UnpackedUnion(_) => SmolStr::new_static("union"),
            Type::Alias(a) => a.name.clone(),
            Type::CHandle => SmolStr::new_static("chandle"),
            Type::String => SmolStr::new_static("string"),
            Type::Event => SmolStr::new_static("event"),
            Type::Null => SmolStr::new_static("null"),
            Type::Void => SmolStr::new_static("void"),
            Type::Error => SmolStr::new_static("<error>"),
        }
    }
}

/// Member description fed to enum construction.
#[derive(Debug, Clone)]
pub struct EnumMemberDecl {
    pub name: SmolStr,
    pub initializer: Option<BitVector>,
    pub location: SourceLocation,
}

/// Member description fed to struct/union construction: the declared type
/// plus per-declarator unpacked dimensions.
#[derive(Debug, Clone)]
pub struct FieldDecl<'a> {
    pub name: SmolStr,
    pub ty: &'a Type<'a>,
    pub unpacked_dims: SmallVec<[ConstantRange; 2]>,
    pub has_initializer: bool,
    pub location: SourceLocation,
}

/// Owns the built-in type singletons and the shared-vector cache for one
/// compilation; every type node it hands out lives in the arena.
pub struct TypeStore<'a> {
    arena: &'a Arena,
    vectors: RefCell<HashMap<(u32, IntegralFlags), &'a Type<'a>>>,
    byte: &'a Type<'a>,
    short_int: &'a Type<'a>,
    int: &'a Type<'a>,
    long_int: &'a Type<'a>,
    integer: &'a Type<'a>,
    time: &'a Type<'a>,
    bit: &'a Type<'a>,
    logic: &'a Type<'a>,
    reg: &'a Type<'a>,
    real: &'a Type<'a>,
    short_real: &'a Type<'a>,
    real_time: &'a Type<'a>,
    string: &'a Type<'a>,
    chandle: &'a Type<'a>,
    event: &'a Type<'a>,
    null: &'a Type<'a>,
    void: &'a Type<'a>,
    error: &'a Type<'a>,
}

impl<'a> TypeStore<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            arena,
            vectors: RefCell::new(HashMap::new()),
            byte: arena.alloc(Type::PredefinedInt(PredefinedIntKind::Byte)),
            short_int: arena.alloc(Type::PredefinedInt(PredefinedIntKind::ShortInt)),
            int: arena.alloc(Type::PredefinedInt(PredefinedIntKind::Int)),
            long_int: arena.alloc(Type::PredefinedInt(PredefinedIntKind::LongInt)),
            integer: arena.alloc(Type::PredefinedInt(PredefinedIntKind::Integer)),
            time: arena.alloc(Type::PredefinedInt(PredefinedIntKind::Time)),
            bit: arena.alloc(Type::Scalar {
                kind: ScalarKind::Bit,
                signed: false,
            }),
            logic: arena.alloc(Type::Scalar {
                kind: ScalarKind::Logic,
                signed: false,
            }),
            reg: arena.alloc(Type::Scalar {
                kind: ScalarKind::Reg,
                signed: false,
            }),
            real: arena.alloc(Type::Floating(FloatingKind::Real)),
            short_real: arena.alloc(Type::Floating(FloatingKind::ShortReal)),
            real_time: arena.alloc(Type::Floating(FloatingKind::RealTime)),
            string: arena.alloc(Type::String),
            chandle: arena.alloc(Type::CHandle),
            event: arena.alloc(Type::Event),
            null: arena.alloc(Type::Null),
            void: arena.alloc(Type::Void),
            error: arena.alloc(Type::Error),
        }
    }

    /// The shared singleton for a predefined integer type.
    pub fn predefined(&self, kind: PredefinedIntKind) -> &'a Type<'a> {
        match kind {
            PredefinedIntKind::Byte => self.byte,
            PredefinedIntKind::ShortInt => self.short_int,
            PredefinedIntKind::Int => self.int,
            PredefinedIntKind::LongInt => self.long_int,
            PredefinedIntKind::Integer => self.integer,
            PredefinedIntKind::Time => self.time,
        }
    }

    pub fn floating(&self, kind: FloatingKind) -> &'a Type<'a> {
        match kind {
            FloatingKind::Real => self.real,
            FloatingKind::ShortReal => self.short_real,
            FloatingKind::RealTime => self.real_time,
        }
    }

    pub fn int_type(&self) -> &'a Type<'a> {
        self.int
    }

    pub fn string_type(&self) -> &'a Type<'a> {
        self.string
    }

    pub fn chandle_type(&self) -> &'a Type<'a> {
        self.chandle
    }

    pub fn event_type(&self) -> &'a Type<'a> {
        self.event
    }

    pub fn null_type(&self) -> &'a Type<'a> {
        self.null
    }

    pub fn void_type(&self) -> &'a Type<'a> {
        self.void
    }

    pub fn error_type(&self) -> &'a Type<'a> {
        self.error
    }

    /// The single-bit type for a flag combination. Unsigned scalars are
    /// the shared singletons.
    pub fn scalar(&self, flags: IntegralFlags) -> &'a Type<'a> {
        if !flags.signed {
            return match flags.scalar_kind() {
                ScalarKind::Bit => self.bit,
                ScalarKind::Logic => self.logic,
                ScalarKind::Reg => self.reg,
            };
        }
        self.vector(1, flags)
    }

    /// The cached simple bit vector for `(width, flags)`.
    ///
    /// Types built twice with identical parameters come back as the same
    /// object, so matching on them is pointer identity.
    pub fn vector(&self, width: u32, flags: IntegralFlags) -> &'a Type<'a> {
        debug_assert!(width >= 1);
        if width == 1 && !flags.signed {
            return self.scalar(flags);
        }

        let key = (width, flags);
        if let Some(&ty) = self.vectors.borrow().get(&key) {
            return ty;
        }

        let ty = if width == 1 {
            self.arena.alloc(Type::Scalar {
                kind: flags.scalar_kind(),
                signed: flags.signed,
            })
        } else {
            let element = self.scalar(flags);
            self.arena.alloc(Type::PackedArray(PackedArrayType {
                element,
                range: ConstantRange::new(width as i32 - 1, 0),
            }))
        };
        self.vectors.borrow_mut().insert(key, ty);
        ty
    }

    /// Folds packed dimensions onto `base`, right-to-left.
    ///
    /// Dimensions on a predefined integer are diagnosed and dropped;
    /// dimensions on a non-integral base produce the error type. The
    /// common single-dimension `[n:0]` scalar case resolves through the
    /// shared-vector cache.
    pub fn apply_packed_dims(
        &self,
        base: &'a Type<'a>,
        dims: &[ConstantRange],
        loc: SourceLocation,
        diags: &mut Diagnostics,
    ) -> &'a Type<'a> {
        if dims.is_empty() {
            return base;
        }
        let canonical = base.canonical();
        if canonical.is_error() {
            return base;
        }
        if canonical.is_predefined_integer() {
            diags.push(
                Diagnostic::error(DiagnosticCode::PACKED_DIMS_ON_PREDEFINED, loc)
                    .with_arg(base.pretty()),
            );
            return base;
        }
        if !canonical.is_integral() {
            diags.push(
                Diagnostic::error(DiagnosticCode::PACKED_DIMS_ON_NON_INTEGRAL, loc)
                    .with_arg(base.pretty()),
            );
            return self.error;
        }

        if let [dim] = dims
            && dim.lsb == 0
            && let Type::Scalar { kind, signed } = canonical
        {
            let flags = IntegralFlags {
                signed: *signed,
                four_state: kind.is_four_state(),
                reg: *kind == ScalarKind::Reg,
            };
            return self.vector(dim.width(), flags);
        }

        let mut result = base;
        for dim in dims.iter().rev() {
            result = self.arena.alloc(Type::PackedArray(PackedArrayType {
                element: result,
                range: *dim,
            }));
        }
        result
    }

    /// Folds unpacked dimensions onto `base`, right-to-left.
    pub fn apply_unpacked_dims(
        &self,
        base: &'a Type<'a>,
        dims: &[ConstantRange],
    ) -> &'a Type<'a> {
        if base.canonical().is_error() {
            return base;
        }
        let mut result = base;
        for dim in dims.iter().rev() {
            result = self.arena.alloc(Type::UnpackedArray(UnpackedArrayType {
                element: result,
                range: *dim,
            }));
        }
        result
    }

    pub fn alias(&self, name: impl Into<SmolStr>, target: &'a Type<'a>) -> &'a Type<'a> {
        self.arena.alloc(Type::Alias(AliasType {
            name: name.into(),
            target,
        }))
    }

    /// Builds an enum type over `base` (defaulting to `int`).
    ///
    /// Members without initializers continue counting from the previous
    /// value; the first starts at zero. A base that is not a simple bit
    /// vector is an error.
    pub fn enum_type(
        &self,
        base: Option<&'a Type<'a>>,
        members: &[EnumMemberDecl],
        loc: SourceLocation,
        diags: &mut Diagnostics,
    ) -> &'a Type<'a> {
        let base = base.unwrap_or(self.int);
        let canonical = base.canonical();
        if canonical.is_error() {
            return canonical;
        }
        if !canonical.is_simple_bit_vector() {
            diags.push(
                Diagnostic::error(DiagnosticCode::INVALID_ENUM_BASE, loc)
                    .with_arg(base.pretty()),
            );
            return self.error;
        }

        let width = canonical.bit_width();
        let signed = canonical.is_signed();
        let mut next = BitVector::zero(width, signed);
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            let value = match &member.initializer {
                Some(v) if v.has_unknown() => {
                    diags.push(
                        Diagnostic::error(DiagnosticCode::ENUM_VALUE_UNKNOWN, member.location)
                            .with_arg(member.name.clone()),
                    );
                    BitVector::zero(width, signed)
                }
                Some(v) => v.clone(),
                None => next.clone(),
            };
            next = value
                .add_one()
                .unwrap_or_else(|| BitVector::zero(width, signed));
            out.push(EnumMember {
                name: member.name.clone(),
                value,
            });
        }

        self.arena.alloc(Type::Enum(EnumType { base, members: out }))
    }

    /// Builds a packed struct. Fields are given MSB-first; each must be
    /// integral, carry no unpacked dimensions, and have no initializer.
    pub fn packed_struct(
        &self,
        signed: bool,
        fields: &[FieldDecl<'a>],
        diags: &mut Diagnostics,
    ) -> &'a Type<'a> {
        let (width, four_state) = self.check_packed_members(fields, diags);

        let mut offset = 0u32;
        let mut members: Vec<StructField<'a>> = Vec::with_capacity(fields.len());
        for field in fields.iter().rev() {
            members.push(StructField {
                name: field.name.clone(),
                ty: field.ty,
                offset,
                location: field.location,
            });
            offset += field.ty.bit_width();
        }
        members.reverse();

        self.arena.alloc(Type::PackedStruct(PackedStructType {
            width,
            signed,
            four_state,
            fields: members,
        }))
    }

    /// Builds a packed union. All members must be integral and share one
    /// width, which becomes the union width.
    pub fn packed_union(
        &self,
        signed: bool,
        fields: &[FieldDecl<'a>],
        diags: &mut Diagnostics,
    ) -> &'a Type<'a> {
        let (_, four_state) = self.check_packed_members(fields, diags);

        let width = fields.first().map(|f| f.ty.bit_width()).unwrap_or(0);
        for field in fields.iter().skip(1) {
            if field.ty.bit_width() != width && !field.ty.is_error() {
                diags.push(
                    Diagnostic::error(DiagnosticCode::PACKED_UNION_WIDTH, field.location)
                        .with_arg(field.name.clone()),
                );
            }
        }

        let members = fields
            .iter()
            .map(|f| StructField {
                name: f.name.clone(),
                ty: f.ty,
                offset: 0,
                location: f.location,
            })
            .collect();

        self.arena.alloc(Type::PackedUnion(PackedUnionType {
            width,
            signed,
            four_state,
            fields: members,
        }))
    }

    /// Builds an unpacked struct; members get sequential field indices
    /// and per-declarator dimensions extend each member's type.
    pub fn unpacked_struct(&self, fields: &[FieldDecl<'a>]) -> &'a Type<'a> {
        self.arena.alloc(Type::UnpackedStruct(UnpackedStructType {
            fields: self.unpacked_members(fields),
        }))
    }

    pub fn unpacked_union(&self, fields: &[FieldDecl<'a>]) -> &'a Type<'a> {
        self.arena.alloc(Type::UnpackedUnion(UnpackedUnionType {
            fields: self.unpacked_members(fields),
        }))
    }

    fn unpacked_members(&self, fields: &[FieldDecl<'a>]) -> Vec<StructField<'a>> {
        fields
            .iter()
            .enumerate()
            .map(|(index, f)| StructField {
                name: f.name.clone(),
                ty: self.apply_unpacked_dims(f.ty, &f.unpacked_dims),
                offset: index as u32,
                location: f.location,
            })
            .collect()
    }

    fn check_packed_members(
        &self,
        fields: &[FieldDecl<'a>],
        diags: &mut Diagnostics,
    ) -> (u32, bool) {
        let mut width = 0u32;
        let mut four_state = false;
        for field in fields {
            four_state |= field.ty.is_four_state();
            width = width.saturating_add(field.ty.bit_width());
            if (!field.ty.is_integral() && !field.ty.is_error())
                || !field.unpacked_dims.is_empty()
            {
                diags.push(
                    Diagnostic::error(DiagnosticCode::PACKED_MEMBER_NOT_INTEGRAL, field.location)
                        .with_arg(field.name.clone()),
                );
            }
            if field.has_initializer {
                diags.push(
                    Diagnostic::error(
                        DiagnosticCode::PACKED_MEMBER_HAS_INITIALIZER,
                        field.location,
                    )
                    .with_arg(field.name.clone()),
                );
            }
        }
        (width, four_state)
    }
}
