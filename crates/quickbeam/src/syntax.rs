//! Syntax shapes
//!
//! Every `syn::Expr` the grammar can hand us is classified into exactly one
//! [`SyntaxShape`]. The transformer matches on this closed enum without a
//! wildcard arm, so each production must be handled explicitly.

use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::Token;

use crate::error::SourceLocation;

/// The productions of the expression language.
#[derive(Debug)]
pub enum SyntaxShape<'a> {
    /// `op operand`
    Unary {
        /// Operator token text
        op: String,
        /// Where the operator token starts
        op_location: SourceLocation,
        /// Operand syntax
        operand: &'a syn::Expr,
    },

    /// `left op right`
    Binary {
        /// Left operand syntax
        left: &'a syn::Expr,
        /// Operator token text
        op: String,
        /// Where the operator token starts
        op_location: SourceLocation,
        /// Right operand syntax
        right: &'a syn::Expr,
    },

    /// Integer or float token, raw text including any suffix
    NumericAtom(String),

    /// String or character token, raw text including quotes
    StringAtom(String),

    /// `true` or `false`
    BoolAtom(bool),

    /// `null`
    NullAtom,

    /// A bare identifier
    IdAtom(String),

    /// `name(args...)`
    FuncInvoke {
        /// Function name
        name: String,
        /// Argument syntax, in order
        args: &'a Punctuated<syn::Expr, Token![,]>,
    },

    /// `instance.property`
    MemberAccess {
        /// Object syntax
        instance: &'a syn::Expr,
        /// Property name
        property: String,
    },

    /// `instance[index]`
    IndexAccess {
        /// Collection syntax
        instance: &'a syn::Expr,
        /// Index syntax
        index: &'a syn::Expr,
    },

    /// `(inner)`
    Parenthesis(&'a syn::Expr),

    /// `[items...]`
    ArrayCreation(&'a Punctuated<syn::Expr, Token![,]>),

    /// Anything else the grammar accepts but the language does not
    Unsupported(&'static str),
}

impl<'a> SyntaxShape<'a> {
    /// Classify one syntax node.
    pub fn of(expr: &'a syn::Expr) -> Self {
        match expr {
            syn::Expr::Unary(unary) => SyntaxShape::Unary {
                op: token_text(&unary.op),
                op_location: location(&unary.op),
                operand: &unary.expr,
            },

            syn::Expr::Binary(binary) if is_compound_assignment(&binary.op) => {
                SyntaxShape::Unsupported("compound assignment")
            }
            syn::Expr::Binary(binary) => SyntaxShape::Binary {
                left: &binary.left,
                op: token_text(&binary.op),
                op_location: location(&binary.op),
                right: &binary.right,
            },

            syn::Expr::Lit(lit) => match &lit.lit {
                syn::Lit::Int(int) => SyntaxShape::NumericAtom(int.to_string()),
                syn::Lit::Float(float) => SyntaxShape::NumericAtom(float.to_string()),
                syn::Lit::Str(s) => SyntaxShape::StringAtom(s.token().to_string()),
                syn::Lit::Char(c) => SyntaxShape::StringAtom(c.token().to_string()),
                syn::Lit::Bool(b) => SyntaxShape::BoolAtom(b.value),
                syn::Lit::ByteStr(_) => SyntaxShape::Unsupported("byte string literal"),
                syn::Lit::Byte(_) => SyntaxShape::Unsupported("byte literal"),
                syn::Lit::CStr(_) => SyntaxShape::Unsupported("C string literal"),
                _ => SyntaxShape::Unsupported("literal"),
            },

            syn::Expr::Path(path) => match simple_name(path) {
                Some(name) if name == "null" => SyntaxShape::NullAtom,
                Some(name) => SyntaxShape::IdAtom(name),
                None => SyntaxShape::Unsupported("qualified path"),
            },

            syn::Expr::Call(call) => match call.func.as_ref() {
                syn::Expr::Path(path) => match simple_name(path) {
                    Some(name) => SyntaxShape::FuncInvoke {
                        name,
                        args: &call.args,
                    },
                    None => SyntaxShape::Unsupported("qualified function name"),
                },
                _ => SyntaxShape::Unsupported("computed function call"),
            },

            syn::Expr::Field(field) => match &field.member {
                syn::Member::Named(ident) => SyntaxShape::MemberAccess {
                    instance: &field.base,
                    property: ident.to_string(),
                },
                syn::Member::Unnamed(_) => SyntaxShape::Unsupported("tuple field access"),
            },

            syn::Expr::Index(index) => SyntaxShape::IndexAccess {
                instance: &index.expr,
                index: &index.index,
            },

            syn::Expr::Paren(paren) => SyntaxShape::Parenthesis(&paren.expr),
            syn::Expr::Group(group) => SyntaxShape::Parenthesis(&group.expr),

            syn::Expr::Array(array) => SyntaxShape::ArrayCreation(&array.elems),

            other => SyntaxShape::Unsupported(expr_kind_name(other)),
        }
    }
}

/// Source text of a token, e.g. `+` or `&&`.
fn token_text(token: &impl ToTokens) -> String {
    token.to_token_stream().to_string()
}

/// Re-rendered source of a syntax node, for error messages.
pub fn source_text(expr: &syn::Expr) -> String {
    expr.to_token_stream().to_string()
}

/// Where a syntax node starts.
pub fn location(node: &impl Spanned) -> SourceLocation {
    SourceLocation::from_span(node.span())
}

/// The identifier of a single-segment path without generics or qualifiers.
fn simple_name(path: &syn::ExprPath) -> Option<String> {
    if path.qself.is_some() {
        return None;
    }
    path.path.get_ident().map(|ident| ident.to_string())
}

fn is_compound_assignment(op: &syn::BinOp) -> bool {
    matches!(
        op,
        syn::BinOp::AddAssign(_)
            | syn::BinOp::SubAssign(_)
            | syn::BinOp::MulAssign(_)
            | syn::BinOp::DivAssign(_)
            | syn::BinOp::RemAssign(_)
            | syn::BinOp::BitAndAssign(_)
            | syn::BinOp::BitOrAssign(_)
            | syn::BinOp::BitXorAssign(_)
            | syn::BinOp::ShlAssign(_)
            | syn::BinOp::ShrAssign(_)
    )
}

/// Human-readable name for constructs without a shape of their own.
fn expr_kind_name(expr: &syn::Expr) -> &'static str {
    match expr {
        syn::Expr::Assign(_) => "assignment",
        syn::Expr::Async(_) => "async block",
        syn::Expr::Await(_) => "await",
        syn::Expr::Block(_) => "block",
        syn::Expr::Break(_) => "break",
        syn::Expr::Cast(_) => "cast",
        syn::Expr::Closure(_) => "closure",
        syn::Expr::Const(_) => "const block",
        syn::Expr::Continue(_) => "continue",
        syn::Expr::ForLoop(_) => "for loop",
        syn::Expr::If(_) => "if",
        syn::Expr::Infer(_) => "infer",
        syn::Expr::Let(_) => "let guard",
        syn::Expr::Loop(_) => "loop",
        syn::Expr::Macro(_) => "macro invocation",
        syn::Expr::Match(_) => "match",
        syn::Expr::MethodCall(_) => "method call",
        syn::Expr::Range(_) => "range",
        syn::Expr::Reference(_) => "reference",
        syn::Expr::Repeat(_) => "repeat",
        syn::Expr::Return(_) => "return",
        syn::Expr::Struct(_) => "struct literal",
        syn::Expr::Try(_) => "try",
        syn::Expr::TryBlock(_) => "try block",
        syn::Expr::Tuple(_) => "tuple",
        syn::Expr::Unsafe(_) => "unsafe block",
        syn::Expr::Verbatim(_) => "verbatim",
        syn::Expr::While(_) => "while",
        syn::Expr::Yield(_) => "yield",
        _ => "expression",
    }
}
