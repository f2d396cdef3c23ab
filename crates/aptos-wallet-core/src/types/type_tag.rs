//! Move type tags and the type signature parser.
//!
//! The parser accepts the textual types a node reports in module ABIs:
//!
//! - primitives: `bool`, `u8`, `u16`, `u32`, `u64`, `u128`, `u256`, `address`, `signer`
//! - `vector<T>` with exactly one type argument
//! - struct paths `ADDRESS::module::Name<T1, T2, ...>`
//! - references `&T` and generic placeholders `T0`, `T1`, ... when the
//!   [`ParseOptions`] allow them
//!
//! Anything else fails with [`WalletError::TypeTagParse`]; nothing is coerced.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{WalletError, WalletResult};
use crate::types::identifier::parse_path_address;
use crate::types::{AccountAddress, Identifier};
use std::fmt;
use std::str::FromStr;

/// Maximum length for type tag strings.
const MAX_TYPE_TAG_LENGTH: usize = 1024;

/// Maximum depth for nested type arguments.
const MAX_TYPE_NESTING_DEPTH: usize = 8;

/// A struct tag identifies a specific struct type in Move.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: Identifier,
    pub name: Identifier,
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(
        address: AccountAddress,
        module: Identifier,
        name: Identifier,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module,
            name,
            type_args,
        }
    }

    fn framework(module: &'static str, name: &'static str, type_args: Vec<TypeTag>) -> Self {
        Self::new(
            AccountAddress::ONE,
            Identifier::from_static(module),
            Identifier::from_static(name),
            type_args,
        )
    }

    /// `0x1::aptos_coin::AptosCoin`
    pub fn aptos_coin() -> Self {
        Self::framework("aptos_coin", "AptosCoin", vec![])
    }

    /// `0x1::string::String`
    pub fn string() -> Self {
        Self::framework("string", "String", vec![])
    }

    /// `0x1::object::Object<inner>`
    pub fn object(inner: TypeTag) -> Self {
        Self::framework("object", "Object", vec![inner])
    }

    /// `0x1::option::Option<inner>`
    pub fn option(inner: TypeTag) -> Self {
        Self::framework("option", "Option", vec![inner])
    }

    /// `0x1::fungible_asset::Metadata`
    pub fn fungible_metadata() -> Self {
        Self::framework("fungible_asset", "Metadata", vec![])
    }

    /// True when this is the framework struct `0x1::module::name`.
    pub fn is_framework(&self, module: &str, name: &str) -> bool {
        self.address == AccountAddress::ONE
            && self.module.as_str() == module
            && self.name.as_str() == name
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl Serializable for StructTag {
    fn serialize(&self, serializer: &mut Serializer) {
        self.address.serialize(serializer);
        self.module.serialize(serializer);
        self.name.serialize(serializer);
        serializer.serialize_vector(&self.type_args);
    }
}

impl StructTag {
    fn deserialize_with_depth(
        deserializer: &mut Deserializer<'_>,
        depth: usize,
    ) -> WalletResult<Self> {
        let address = AccountAddress::deserialize(deserializer)?;
        let module = Identifier::deserialize(deserializer)?;
        let name = Identifier::deserialize(deserializer)?;
        let len = deserializer.deserialize_len()?;
        let mut type_args = Vec::with_capacity(len.min(deserializer.remaining()));
        for _ in 0..len {
            type_args.push(TypeTag::deserialize_with_depth(deserializer, depth + 1)?);
        }
        Ok(Self {
            address,
            module,
            name,
            type_args,
        })
    }
}

impl Deserializable for StructTag {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::deserialize_with_depth(deserializer, 0)
    }
}

/// A Move type.
///
/// `Generic` and `Reference` only appear in ABI signatures and script
/// arguments, never in stored values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    /// A generic placeholder `T{index}`.
    Generic(u32),
    /// A reference `&T`.
    Reference(Box<TypeTag>),
}

impl TypeTag {
    const BOOL: u32 = 0;
    const U8_TAG: u32 = 1;
    const U64_TAG: u32 = 2;
    const U128_TAG: u32 = 3;
    const ADDRESS: u32 = 4;
    const SIGNER: u32 = 5;
    const VECTOR: u32 = 6;
    const STRUCT: u32 = 7;
    const U16_TAG: u32 = 8;
    const U32_TAG: u32 = 9;
    const U256_TAG: u32 = 10;
    const REFERENCE: u32 = 254;
    const GENERIC: u32 = 255;

    pub fn vector(element: TypeTag) -> Self {
        Self::Vector(Box::new(element))
    }

    pub fn struct_tag(tag: StructTag) -> Self {
        Self::Struct(Box::new(tag))
    }

    /// `0x1::aptos_coin::AptosCoin`
    pub fn aptos_coin() -> Self {
        Self::struct_tag(StructTag::aptos_coin())
    }

    /// True for `signer` and `&signer`.
    pub fn is_signer(&self) -> bool {
        match self {
            Self::Signer => true,
            Self::Reference(inner) => matches!(**inner, Self::Signer),
            _ => false,
        }
    }

    /// True if the type mentions a generic placeholder anywhere.
    pub fn has_generics(&self) -> bool {
        match self {
            Self::Generic(_) => true,
            Self::Vector(inner) | Self::Reference(inner) => inner.has_generics(),
            Self::Struct(tag) => tag.type_args.iter().any(Self::has_generics),
            _ => false,
        }
    }

    /// Replaces generic placeholders with concrete type arguments.
    pub fn substitute(&self, type_args: &[TypeTag]) -> WalletResult<TypeTag> {
        Ok(match self {
            Self::Generic(index) => type_args.get(*index as usize).cloned().ok_or_else(|| {
                WalletError::AbiMismatch(format!(
                    "generic T{index} has no type argument ({} supplied)",
                    type_args.len()
                ))
            })?,
            Self::Vector(inner) => Self::vector(inner.substitute(type_args)?),
            Self::Reference(inner) => Self::Reference(Box::new(inner.substitute(type_args)?)),
            Self::Struct(tag) => Self::struct_tag(StructTag {
                type_args: tag
                    .type_args
                    .iter()
                    .map(|t| t.substitute(type_args))
                    .collect::<WalletResult<_>>()?,
                ..(**tag).clone()
            }),
            other => other.clone(),
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(tag) => write!(f, "{tag}"),
            TypeTag::Generic(index) => write!(f, "T{index}"),
            TypeTag::Reference(inner) => write!(f, "&{inner}"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = WalletError;

    /// Parses a concrete type; generics and references are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_tag(s, ParseOptions::default())
    }
}

impl Serializable for TypeTag {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            TypeTag::Bool => serializer.serialize_variant_index(Self::BOOL),
            TypeTag::U8 => serializer.serialize_variant_index(Self::U8_TAG),
            TypeTag::U16 => serializer.serialize_variant_index(Self::U16_TAG),
            TypeTag::U32 => serializer.serialize_variant_index(Self::U32_TAG),
            TypeTag::U64 => serializer.serialize_variant_index(Self::U64_TAG),
            TypeTag::U128 => serializer.serialize_variant_index(Self::U128_TAG),
            TypeTag::U256 => serializer.serialize_variant_index(Self::U256_TAG),
            TypeTag::Address => serializer.serialize_variant_index(Self::ADDRESS),
            TypeTag::Signer => serializer.serialize_variant_index(Self::SIGNER),
            TypeTag::Vector(inner) => {
                serializer.serialize_variant_index(Self::VECTOR);
                inner.serialize(serializer);
            }
            TypeTag::Struct(tag) => {
                serializer.serialize_variant_index(Self::STRUCT);
                tag.serialize(serializer);
            }
            TypeTag::Reference(inner) => {
                serializer.serialize_variant_index(Self::REFERENCE);
                inner.serialize(serializer);
            }
            TypeTag::Generic(index) => {
                serializer.serialize_variant_index(Self::GENERIC);
                serializer.serialize_u32(*index);
            }
        }
    }
}

impl TypeTag {
    fn deserialize_with_depth(
        deserializer: &mut Deserializer<'_>,
        depth: usize,
    ) -> WalletResult<Self> {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return Err(WalletError::deserialization(format!(
                "type nesting deeper than {MAX_TYPE_NESTING_DEPTH} levels"
            )));
        }
        Ok(match deserializer.deserialize_variant_index()? {
            Self::BOOL => TypeTag::Bool,
            Self::U8_TAG => TypeTag::U8,
            Self::U16_TAG => TypeTag::U16,
            Self::U32_TAG => TypeTag::U32,
            Self::U64_TAG => TypeTag::U64,
            Self::U128_TAG => TypeTag::U128,
            Self::U256_TAG => TypeTag::U256,
            Self::ADDRESS => TypeTag::Address,
            Self::SIGNER => TypeTag::Signer,
            Self::VECTOR => {
                TypeTag::Vector(Box::new(Self::deserialize_with_depth(deserializer, depth + 1)?))
            }
            Self::STRUCT => TypeTag::Struct(Box::new(StructTag::deserialize_with_depth(
                deserializer,
                depth,
            )?)),
            Self::REFERENCE => {
                TypeTag::Reference(Box::new(Self::deserialize_with_depth(deserializer, depth + 1)?))
            }
            Self::GENERIC => TypeTag::Generic(deserializer.deserialize_u32()?),
            other => return Err(WalletError::unknown_variant("TypeTag", other)),
        })
    }
}

impl Deserializable for TypeTag {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::deserialize_with_depth(deserializer, 0)
    }
}

/// Which non-concrete forms the parser accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept `T0`, `T1`, ... placeholders.
    pub allow_generics: bool,
    /// Accept `&T` references.
    pub allow_references: bool,
}

impl ParseOptions {
    /// Options for ABI signatures, which carry both generics and `&signer`.
    pub fn abi() -> Self {
        Self {
            allow_generics: true,
            allow_references: true,
        }
    }

    pub fn with_generics(allow_generics: bool) -> Self {
        Self {
            allow_generics,
            ..Self::default()
        }
    }
}

/// Parses a textual Move type.
///
/// # Errors
///
/// Returns [`WalletError::TypeTagParse`] for malformed text, malformed
/// addresses or identifiers, wrong `vector` arity, disallowed generics or
/// references, or input beyond the length and nesting limits.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::types::{parse_type_tag, ParseOptions};
///
/// let tag = parse_type_tag(
///     "vector<0x1::coin::Coin<0x1::aptos_coin::AptosCoin>>",
///     ParseOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(tag.to_string(), "vector<0x1::coin::Coin<0x1::aptos_coin::AptosCoin>>");
/// ```
pub fn parse_type_tag(text: &str, options: ParseOptions) -> WalletResult<TypeTag> {
    if text.len() > MAX_TYPE_TAG_LENGTH {
        return Err(WalletError::TypeTagParse(format!(
            "type tag too long: {} bytes (max {MAX_TYPE_TAG_LENGTH})",
            text.len()
        )));
    }
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        source: text,
        tokens,
        position: 0,
        options,
    };
    let tag = parser.parse_type(0)?;
    if let Some(token) = parser.peek() {
        return Err(parser.error(&format!("unexpected trailing '{token}'")));
    }
    Ok(tag)
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    PathSep,
    Lt,
    Gt,
    Comma,
    Amp,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::PathSep => f.write_str("::"),
            Token::Lt => f.write_str("<"),
            Token::Gt => f.write_str(">"),
            Token::Comma => f.write_str(","),
            Token::Amp => f.write_str("&"),
        }
    }
}

fn tokenize(text: &str) -> WalletResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '<' => tokens.push(Token::Lt),
            '>' => tokens.push(Token::Gt),
            ',' => tokens.push(Token::Comma),
            '&' => tokens.push(Token::Amp),
            ':' => match chars.next() {
                Some((_, ':')) => tokens.push(Token::PathSep),
                _ => {
                    return Err(WalletError::TypeTagParse(format!(
                        "stray ':' at offset {start} in '{text}'"
                    )))
                }
            },
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(&text[start..end]));
            }
            other => {
                return Err(WalletError::TypeTagParse(format!(
                    "unexpected character '{other}' at offset {start} in '{text}'"
                )))
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    position: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn error(&self, message: &str) -> WalletError {
        WalletError::TypeTagParse(format!("{message} in '{}'", self.source))
    }

    fn expect(&mut self, expected: Token<'static>) -> WalletResult<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(self.error(&format!("expected '{expected}', found '{token}'"))),
            None => Err(self.error(&format!("expected '{expected}', found end of input"))),
        }
    }

    fn expect_word(&mut self) -> WalletResult<&'a str> {
        match self.next() {
            Some(Token::Word(word)) => Ok(word),
            Some(token) => Err(self.error(&format!("expected a name, found '{token}'"))),
            None => Err(self.error("expected a name, found end of input")),
        }
    }

    fn parse_type(&mut self, depth: usize) -> WalletResult<TypeTag> {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return Err(self.error(&format!(
                "type nesting deeper than {MAX_TYPE_NESTING_DEPTH} levels"
            )));
        }

        if self.peek() == Some(&Token::Amp) {
            if !self.options.allow_references {
                return Err(self.error("references are not allowed here"));
            }
            self.next();
            let inner = self.parse_type(depth + 1)?;
            return Ok(TypeTag::Reference(Box::new(inner)));
        }

        let word = self.expect_word()?;
        let primitive = match word {
            "bool" => Some(TypeTag::Bool),
            "u8" => Some(TypeTag::U8),
            "u16" => Some(TypeTag::U16),
            "u32" => Some(TypeTag::U32),
            "u64" => Some(TypeTag::U64),
            "u128" => Some(TypeTag::U128),
            "u256" => Some(TypeTag::U256),
            "address" => Some(TypeTag::Address),
            "signer" => Some(TypeTag::Signer),
            _ => None,
        };
        if let Some(tag) = primitive {
            return Ok(tag);
        }

        if word == "vector" {
            self.expect(Token::Lt)?;
            let mut args = self.parse_type_args(depth)?;
            if args.len() != 1 {
                return Err(self.error(&format!(
                    "vector takes exactly one type argument, got {}",
                    args.len()
                )));
            }
            return Ok(TypeTag::vector(args.remove(0)));
        }

        if let Some(index) = generic_index(word) {
            if !self.options.allow_generics {
                return Err(self.error(&format!("generic '{word}' is not allowed here")));
            }
            return Ok(TypeTag::Generic(index));
        }

        self.parse_struct(word, depth)
    }

    fn parse_struct(&mut self, address: &'a str, depth: usize) -> WalletResult<TypeTag> {
        if self.peek() != Some(&Token::PathSep) {
            return Err(self.error(&format!("unknown type '{address}'")));
        }
        let address = parse_path_address(address)
            .map_err(|e| self.error(&e.to_string()))?;
        self.expect(Token::PathSep)?;
        let module = Identifier::new(self.expect_word()?)?;
        self.expect(Token::PathSep)?;
        let name = Identifier::new(self.expect_word()?)?;
        if self.peek() == Some(&Token::PathSep) {
            return Err(self.error("struct path must have exactly three segments"));
        }

        let type_args = if self.peek() == Some(&Token::Lt) {
            self.next();
            let args = self.parse_type_args(depth)?;
            if args.is_empty() {
                return Err(self.error("empty type argument list"));
            }
            args
        } else {
            vec![]
        };

        Ok(TypeTag::struct_tag(StructTag::new(
            address, module, name, type_args,
        )))
    }

    /// Parses `T, U, ...>` after the opening `<` has been consumed.
    fn parse_type_args(&mut self, depth: usize) -> WalletResult<Vec<TypeTag>> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::Gt) {
            self.next();
            return Ok(args);
        }
        loop {
            args.push(self.parse_type(depth + 1)?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::Gt) => return Ok(args),
                Some(token) => {
                    return Err(self.error(&format!("expected ',' or '>', found '{token}'")))
                }
                None => return Err(self.error("unclosed type argument list")),
            }
        }
    }
}

/// `T0`, `T1`, ... map to their index.
fn generic_index(word: &str) -> Option<u32> {
    let digits = word.strip_prefix('T')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
