//! Method override detection over a frozen class hierarchy.
//!
//! For class-extends languages a method overrides the first matching
//! method found along the ancestor list (method-resolution order when
//! available, first match wins). Rust has no class-extends relation, so
//! "override" is redefined there: an `impl Trait for Type` method
//! corresponds to the trait's required or default method.
//!
//! Signature matching is name plus parameter count. This is
//! intentionally coarse: languages with overloading will produce
//! false-positive matches between overloads, a known limitation rather
//! than a bug.

use crate::config::get_config;
use crate::hierarchy::{ClassHierarchy, ClassKey, ClassNode};
use crate::types::{ClassLikeKind, MethodInfo};
use parser_core::SupportedLanguage;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Reference to one method of one class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub class: ClassKey,
    pub name: String,
}

impl MethodRef {
    pub fn new(class: ClassKey, name: impl Into<String>) -> Self {
        Self {
            class,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for MethodRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.class, self.name)
    }
}

/// Override facts for one method.
#[derive(Debug, Clone)]
pub struct OverrideInfo {
    pub method: MethodRef,
    /// The nearest ancestor (or trait/interface) method this overrides.
    pub overrides: Option<MethodRef>,
    /// Descendant methods that override this one.
    pub overridden_by: Vec<MethodRef>,
    /// Full chain from the topmost ancestor definition down to this
    /// method; always ends with `method`.
    pub chain: Vec<MethodRef>,
    pub is_abstract: bool,
    /// No descendant overrides this method.
    pub is_final: bool,
}

/// Aggregated override information for a hierarchy.
#[derive(Debug, Default)]
pub struct MethodOverrideMap {
    infos: Vec<OverrideInfo>,
    index: FxHashMap<MethodRef, usize>,
    /// Methods never overridden further.
    pub leaf_methods: Vec<MethodRef>,
    /// Abstract methods: obligations on concrete descendants, tracked
    /// whether or not anything overrides them yet.
    pub abstract_methods: Vec<MethodRef>,
}

impl MethodOverrideMap {
    pub fn get(&self, class: &ClassKey, method: &str) -> Option<&OverrideInfo> {
        let method_ref = MethodRef::new(class.clone(), method);
        self.index.get(&method_ref).map(|&i| &self.infos[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverrideInfo> {
        self.infos.iter()
    }

    /// Descendant methods overriding the given method.
    pub fn find_overriding_methods(&self, class: &ClassKey, method: &str) -> &[MethodRef] {
        self.get(class, method)
            .map(|info| info.overridden_by.as_slice())
            .unwrap_or(&[])
    }

    /// The ancestor method the given method overrides, if any.
    pub fn find_overridden_method(&self, class: &ClassKey, method: &str) -> Option<&MethodRef> {
        self.get(class, method)?.overrides.as_ref()
    }

    /// Root-to-leaf override chain ending at the given method.
    pub fn get_override_chain(&self, class: &ClassKey, method: &str) -> &[MethodRef] {
        self.get(class, method)
            .map(|info| info.chain.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_abstract_method(&self, class: &ClassKey, method: &str) -> bool {
        self.get(class, method)
            .map(|info| info.is_abstract)
            .unwrap_or(false)
    }

    pub fn get_leaf_methods(&self) -> &[MethodRef] {
        &self.leaf_methods
    }

    fn insert(&mut self, info: OverrideInfo) {
        self.index.insert(info.method.clone(), self.infos.len());
        self.infos.push(info);
    }
}

/// Two methods match when their names and parameter counts are equal.
fn signatures_match(a: &MethodInfo, b: &MethodInfo) -> bool {
    a.name == b.name && a.param_count == b.param_count
}

/// Detect overrides for every method of every class, in hierarchy
/// discovery order.
pub fn detect_overrides(hierarchy: &ClassHierarchy) -> MethodOverrideMap {
    let mut map = MethodOverrideMap::default();

    for class in hierarchy.iter() {
        let Ok(language) = parser_core::detect_language_from_path(&class.key.file_path) else {
            continue;
        };
        let config = get_config(language);

        for method_name in &class.method_order {
            let method = &class.methods[method_name];
            if method.is_static || config.is_skip_listed_method(method_name) {
                continue;
            }

            let info = if language == SupportedLanguage::Rust && class.kind != ClassLikeKind::Trait
            {
                detect_rust_impl_override(hierarchy, class, method)
            } else {
                detect_class_override(hierarchy, class, method)
            };

            if info.is_abstract {
                map.abstract_methods.push(info.method.clone());
            }
            if info.is_final {
                map.leaf_methods.push(info.method.clone());
            }
            map.insert(info);
        }
    }

    log::debug!(
        "override analysis: {} methods, {} abstract, {} leaves",
        map.infos.len(),
        map.abstract_methods.len(),
        map.leaf_methods.len()
    );
    map
}

/// Class-extends model: search the ancestor list in MRO order for the
/// first signature match; fall back to directly implemented
/// interfaces. Descendants are scanned symmetrically for overrides of
/// this method.
fn detect_class_override(
    hierarchy: &ClassHierarchy,
    class: &ClassNode,
    method: &MethodInfo,
) -> OverrideInfo {
    let method_ref = MethodRef::new(class.key.clone(), &method.name);

    // All ancestor definitions along the MRO, nearest first. Chains are
    // almost always short; stay on the stack.
    let mut ancestor_matches: SmallVec<[MethodRef; 4]> = SmallVec::new();
    let ancestors = class.method_resolution_order.get(1..).unwrap_or(&[]);
    for ancestor_key in ancestors {
        if let Some(ancestor) = hierarchy.get(ancestor_key) {
            if let Some(ancestor_method) = ancestor.methods.get(&method.name) {
                if signatures_match(ancestor_method, method) {
                    ancestor_matches.push(MethodRef::new(ancestor_key.clone(), &method.name));
                }
            }
        }
    }
    if ancestor_matches.is_empty() {
        // Implemented interfaces can declare the obligation instead.
        for interface_name in &class.interfaces {
            if let Some(interface) = hierarchy.get_by_name(interface_name, &class.key.file_path) {
                if let Some(interface_method) = interface.methods.get(&method.name) {
                    if signatures_match(interface_method, method) {
                        ancestor_matches
                            .push(MethodRef::new(interface.key.clone(), &method.name));
                        break;
                    }
                }
            }
        }
    }

    let overridden_by = collect_descendant_overrides(hierarchy, class, method);

    // Chain runs topmost ancestor first, this method last.
    let mut chain: Vec<MethodRef> = ancestor_matches.iter().rev().cloned().collect();
    chain.push(method_ref.clone());

    OverrideInfo {
        method: method_ref,
        overrides: ancestor_matches.first().cloned(),
        is_final: overridden_by.is_empty(),
        overridden_by,
        chain,
        is_abstract: method.is_abstract,
    }
}

/// Rust model: an impl method on a type corresponds to a method of one
/// of the traits the type implements. Implementors of a trait are the
/// trait method's "descendants".
fn detect_rust_impl_override(
    hierarchy: &ClassHierarchy,
    class: &ClassNode,
    method: &MethodInfo,
) -> OverrideInfo {
    let method_ref = MethodRef::new(class.key.clone(), &method.name);

    let mut overrides = None;
    for trait_name in &class.interfaces {
        if let Some(trait_node) = hierarchy.get_by_name(trait_name, &class.key.file_path) {
            if trait_node.kind != ClassLikeKind::Trait {
                continue;
            }
            if let Some(trait_method) = trait_node.methods.get(&method.name) {
                if signatures_match(trait_method, method) {
                    overrides = Some(MethodRef::new(trait_node.key.clone(), &method.name));
                    break;
                }
            }
        }
    }

    let mut chain = Vec::new();
    if let Some(trait_method) = &overrides {
        chain.push(trait_method.clone());
    }
    chain.push(method_ref.clone());

    OverrideInfo {
        method: method_ref,
        overrides,
        // Impl methods have no subtypes in the class-extends sense.
        overridden_by: Vec::new(),
        chain,
        is_abstract: method.is_abstract,
        is_final: true,
    }
}

/// Methods in descendant classes (or, for traits, implementing types)
/// matching this method's signature.
fn collect_descendant_overrides(
    hierarchy: &ClassHierarchy,
    class: &ClassNode,
    method: &MethodInfo,
) -> Vec<MethodRef> {
    let mut overriding = Vec::new();
    for descendant_key in &class.all_descendants {
        if let Some(descendant) = hierarchy.get(descendant_key) {
            if let Some(descendant_method) = descendant.methods.get(&method.name) {
                if signatures_match(descendant_method, method) {
                    overriding.push(MethodRef::new(descendant_key.clone(), &method.name));
                }
            }
        }
    }

    // Trait methods are also "overridden" by every impl that provides
    // them; likewise interface methods by their implementors.
    if matches!(class.kind, ClassLikeKind::Trait | ClassLikeKind::Interface) {
        for implementor in hierarchy.iter() {
            if implementor.key == class.key {
                continue;
            }
            let implements = implementor
                .interfaces
                .iter()
                .any(|name| name == class.name());
            if !implements {
                continue;
            }
            if let Some(impl_method) = implementor.methods.get(&method.name) {
                if signatures_match(impl_method, method) {
                    let method_ref = MethodRef::new(implementor.key.clone(), &method.name);
                    if !overriding.contains(&method_ref) {
                        overriding.push(method_ref);
                    }
                }
            }
        }
    }
    overriding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_file;
    use crate::hierarchy::build_hierarchy;
    use crate::types::FileIndex;
    use parser_core::{GenericParser, ParsedFile};

    fn analyze(files: &[(&str, &str)]) -> (ClassHierarchy, MethodOverrideMap) {
        let parser = GenericParser::new();
        let parsed: Vec<ParsedFile> = files
            .iter()
            .map(|(path, source)| parser.parse_path(path, source).unwrap())
            .collect();
        let indexes: Vec<FileIndex> = parsed.iter().map(extract_file).collect();
        let index_refs: Vec<&FileIndex> = indexes.iter().collect();
        let contexts: FxHashMap<String, &ParsedFile> = parsed
            .iter()
            .map(|p| (p.file_path.clone(), p))
            .collect();
        let hierarchy = build_hierarchy(&index_refs, &contexts);
        let overrides = detect_overrides(&hierarchy);
        (hierarchy, overrides)
    }

    #[test]
    fn python_override_chain_is_root_to_leaf() {
        let source = "\
class Animal:
    def speak(self):
        pass

class Dog(Animal):
    def speak(self):
        pass

class Puppy(Dog):
    def speak(self):
        pass
";
        let (hierarchy, overrides) = analyze(&[("zoo.py", source)]);
        let puppy = hierarchy.get_by_name("Puppy", "zoo.py").unwrap().key.clone();
        let animal = hierarchy.get_by_name("Animal", "zoo.py").unwrap().key.clone();
        let dog = hierarchy.get_by_name("Dog", "zoo.py").unwrap().key.clone();

        // Two ancestor definitions -> chain of three, self last.
        let chain = overrides.get_override_chain(&puppy, "speak");
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].class, animal);
        assert_eq!(chain[1].class, dog);
        assert_eq!(chain[2], MethodRef::new(puppy.clone(), "speak"));

        // Nearest ancestor wins for the direct override link.
        assert_eq!(
            overrides.find_overridden_method(&puppy, "speak").unwrap().class,
            dog
        );

        // The root sees both descendants.
        let overriding = overrides.find_overriding_methods(&animal, "speak");
        assert_eq!(overriding.len(), 2);

        // Only the deepest override is a leaf.
        assert!(overrides.get(&puppy, "speak").unwrap().is_final);
        assert!(!overrides.get(&dog, "speak").unwrap().is_final);
        assert!(overrides
            .get_leaf_methods()
            .contains(&MethodRef::new(puppy, "speak")));
    }

    #[test]
    fn arity_mismatch_is_not_an_override() {
        let source = "\
class Base:
    def update(self, value):
        pass

class Child(Base):
    def update(self, value, flag):
        pass
";
        let (hierarchy, overrides) = analyze(&[("m.py", source)]);
        let child = hierarchy.get_by_name("Child", "m.py").unwrap().key.clone();
        let base = hierarchy.get_by_name("Base", "m.py").unwrap().key.clone();

        assert!(overrides.find_overridden_method(&child, "update").is_none());
        assert!(overrides.find_overriding_methods(&base, "update").is_empty());
    }

    #[test]
    fn python_dunders_skipped_but_init_tracked() {
        let source = "\
class Base:
    def __init__(self):
        pass

    def __repr__(self):
        return ''

class Child(Base):
    def __init__(self):
        pass
";
        let (hierarchy, overrides) = analyze(&[("m.py", source)]);
        let child = hierarchy.get_by_name("Child", "m.py").unwrap().key.clone();
        let base = hierarchy.get_by_name("Base", "m.py").unwrap().key.clone();

        assert!(overrides.find_overridden_method(&child, "__init__").is_some());
        assert!(overrides.get(&base, "__repr__").is_none());
    }

    #[test]
    fn abstract_methods_tracked_as_obligations() {
        let source = "\
from abc import ABC, abstractmethod

class Shape(ABC):
    @abstractmethod
    def area(self):
        ...

    @abstractmethod
    def perimeter(self):
        ...

class Circle(Shape):
    def area(self):
        return 3
";
        let (hierarchy, overrides) = analyze(&[("shapes.py", source)]);
        let shape = hierarchy.get_by_name("Shape", "shapes.py").unwrap().key.clone();

        assert!(overrides.is_abstract_method(&shape, "area"));
        // Still abstract even though nothing overrides it yet.
        assert!(overrides.is_abstract_method(&shape, "perimeter"));
        assert_eq!(overrides.abstract_methods.len(), 2);

        let area_overrides = overrides.find_overriding_methods(&shape, "area");
        assert_eq!(area_overrides.len(), 1);
        assert_eq!(area_overrides[0].class.name, "Circle");
        assert!(overrides.find_overriding_methods(&shape, "perimeter").is_empty());
    }

    #[test]
    fn static_methods_are_not_analyzed() {
        let source = "\
class Util:
    @staticmethod
    def helper():
        pass
";
        let (hierarchy, overrides) = analyze(&[("m.py", source)]);
        let util = hierarchy.get_by_name("Util", "m.py").unwrap().key.clone();
        assert!(overrides.get(&util, "helper").is_none());
    }

    #[test]
    fn rust_impl_methods_override_trait_methods() {
        let source = "\
trait Speak {
    fn speak(&self) -> String;
    fn greet(&self) -> String {
        String::from(\"hi\")
    }
}

struct Dog;

impl Speak for Dog {
    fn speak(&self) -> String {
        String::from(\"woof\")
    }
}
";
        let (hierarchy, overrides) = analyze(&[("lib.rs", source)]);
        let dog = hierarchy.get_by_name("Dog", "lib.rs").unwrap().key.clone();
        let speak_trait = hierarchy.get_by_name("Speak", "lib.rs").unwrap().key.clone();

        // The impl method corresponds to the trait's required method.
        let info = overrides.get(&dog, "speak").unwrap();
        assert_eq!(info.overrides.as_ref().unwrap().class, speak_trait);
        assert_eq!(info.chain.len(), 2);

        // The required trait method is an abstract obligation, and the
        // impl shows up as its implementor.
        assert!(overrides.is_abstract_method(&speak_trait, "speak"));
        let implementors = overrides.find_overriding_methods(&speak_trait, "speak");
        assert_eq!(implementors.len(), 1);
        assert_eq!(implementors[0].class, dog);

        // The default method has no implementors yet.
        assert!(overrides.find_overriding_methods(&speak_trait, "greet").is_empty());
        assert!(!overrides.is_abstract_method(&speak_trait, "greet"));
    }

    #[test]
    fn ts_implements_counts_as_obligation() {
        let source = "\
interface Swimmable {
    swim(distance: number): void;
}

class Duck implements Swimmable {
    swim(distance: number): void {}
}
";
        let (hierarchy, overrides) = analyze(&[("duck.ts", source)]);
        let duck = hierarchy.get_by_name("Duck", "duck.ts").unwrap().key.clone();
        let swimmable = hierarchy.get_by_name("Swimmable", "duck.ts").unwrap().key.clone();

        let info = overrides.get(&duck, "swim").unwrap();
        assert_eq!(info.overrides.as_ref().unwrap().class, swimmable);

        let implementors = overrides.find_overriding_methods(&swimmable, "swim");
        assert_eq!(implementors.len(), 1);
    }
}
