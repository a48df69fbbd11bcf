//! Pre-decomposed class stubs handed in by the parser or the binary reader.
//!
//! Stubs name other classes by symbol; building a definition from a stub
//! turns each name into a declaration of the session's registry.

use jolt_ir::{Modifiers, Span, Symbol};
use jolt_types::TypeId;
use rustc_hash::FxHashMap;

use super::{ClassDefinition, MemberDefinition, MemberKind, Origin};
use crate::Environment;

/// A class as the parser or binary reader describes it.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub(crate) name: Symbol,
    pub(crate) span: Span,
    pub(crate) modifiers: Modifiers,
    pub(crate) super_class: Option<Symbol>,
    pub(crate) interfaces: Vec<Symbol>,
    pub(crate) outer: Option<Symbol>,
    pub(crate) members: Vec<MemberInfo>,
    pub(crate) local_classes: Vec<(Symbol, Symbol)>,
    pub(crate) source: Option<Symbol>,
}

impl ClassInfo {
    pub fn new(name: Symbol) -> Self {
        ClassInfo {
            name,
            span: Span::DUMMY,
            modifiers: Modifiers::empty(),
            super_class: None,
            interfaces: Vec::new(),
            outer: None,
            members: Vec::new(),
            local_classes: Vec::new(),
            source: None,
        }
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn extends(mut self, super_class: Symbol) -> Self {
        self.super_class = Some(super_class);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: Symbol) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn nested_in(mut self, outer: Symbol) -> Self {
        self.outer = Some(outer);
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    /// A class declared in a block of this class, under its discriminator
    /// (`1`, `1Local`, ...).
    #[must_use]
    pub fn with_local_class(mut self, discriminator: Symbol, class: Symbol) -> Self {
        self.local_classes.push((discriminator, class));
        self
    }

    #[must_use]
    pub fn from_file(mut self, file: Symbol) -> Self {
        self.source = Some(file);
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) enum MemberInfoKind {
    Field,
    Method { exceptions: Vec<Symbol> },
    InnerClass(Symbol),
}

/// A field, method or inner-class member of a [`ClassInfo`].
#[derive(Clone, Debug)]
pub struct MemberInfo {
    pub(crate) name: Symbol,
    pub(crate) span: Span,
    pub(crate) modifiers: Modifiers,
    pub(crate) ty: TypeId,
    pub(crate) kind: MemberInfoKind,
}

impl MemberInfo {
    fn new(name: Symbol, ty: TypeId, kind: MemberInfoKind) -> Self {
        MemberInfo {
            name,
            span: Span::DUMMY,
            modifiers: Modifiers::empty(),
            ty,
            kind,
        }
    }

    pub fn field(name: Symbol, ty: TypeId) -> Self {
        Self::new(name, ty, MemberInfoKind::Field)
    }

    /// A method; `ty` must be a method type.
    pub fn method(name: Symbol, ty: TypeId) -> Self {
        Self::new(
            name,
            ty,
            MemberInfoKind::Method {
                exceptions: Vec::new(),
            },
        )
    }

    /// The member through which `class` is nested; `name` is its simple name.
    pub fn inner_class(name: Symbol, class: Symbol) -> Self {
        Self::new(name, TypeId::ERROR, MemberInfoKind::InnerClass(class))
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn throws(mut self, exception: Symbol) -> Self {
        if let MemberInfoKind::Method { exceptions } = &mut self.kind {
            exceptions.push(exception);
        }
        self
    }
}

impl ClassDefinition {
    /// Build a definition, declaring every class the stub mentions.
    pub fn from_info(env: &Environment, info: &ClassInfo, origin: Origin) -> ClassDefinition {
        let decl = env.class_declaration(info.name);
        let owner = decl.id();
        let declare = |name: Symbol| env.class_declaration(name).id();

        let members = info
            .members
            .iter()
            .map(|member| {
                let (ty, kind) = match &member.kind {
                    MemberInfoKind::Field => (member.ty, MemberKind::Field),
                    MemberInfoKind::Method { exceptions } => (
                        member.ty,
                        MemberKind::Method {
                            exceptions: exceptions.iter().map(|&e| declare(e)).collect(),
                        },
                    ),
                    MemberInfoKind::InnerClass(class) => {
                        let inner = env.class_declaration(*class);
                        (inner.ty(), MemberKind::InnerClass(inner.id()))
                    }
                };
                MemberDefinition {
                    owner,
                    name: member.name,
                    span: member.span,
                    modifiers: member.modifiers,
                    ty,
                    kind,
                }
            })
            .collect();

        let local_classes: FxHashMap<Symbol, _> = info
            .local_classes
            .iter()
            .map(|&(discriminator, class)| (discriminator, declare(class)))
            .collect();

        ClassDefinition::new(
            decl.ty(),
            owner,
            env.types().clone(),
            origin,
            super::Header {
                span: info.span,
                source: info.source,
                modifiers: info.modifiers,
                super_class: info.super_class.map(declare),
                interfaces: info.interfaces.iter().map(|&i| declare(i)).collect(),
                outer: info.outer.map(declare),
            },
            members,
            local_classes,
        )
    }
}
