//! `ValueSpace`: builds the three sealed registries once and exposes
//! every value operation as an inherent method over a `Host`, so a
//! caller doesn't need to thread `&dyn Host` through every call site
//! by hand.
//!
//! Construct one per interpreter instance.

use std::rc::Rc;

use crate::callback::{self, BoundInvocable};
use crate::coerce::{self, Number};
use crate::compare;
use crate::error::CallbackError;
use crate::host::Host;
use crate::registry::{ClassRegistry, ConstantRegistry, FunctionRegistry};
use crate::values::array_key::ArrayKey;
use crate::values::object::PhpObject;
use crate::values::reference::Reference;
use crate::values::resource::{Resource, ResourceKind};
use crate::values::value::Value;
use crate::values::PhpArray;

/// A fully constructed value core, bound to one `Host`.
///
/// Every method here just forwards to the corresponding free function
/// in [`crate::compare`]/[`crate::coerce`]/[`crate::arith`]/etc,
/// passing `self.host.as_ref()` along — the free functions remain the
/// actual implementation and the unit under test in each module's own
/// `#[cfg(test)]` block; `ValueSpace` is the ergonomic facade a host
/// embeds.
pub struct ValueSpace {
    host: Rc<dyn Host>,
    constants: ConstantRegistry,
    functions: FunctionRegistry,
    classes: ClassRegistry,
}

impl ValueSpace {
    /// Build a space with the given host and module-contributed
    /// registries: built exactly once here and never mutated again.
    pub fn new(
        host: Rc<dyn Host>,
        module_constants: impl IntoIterator<Item = (String, Value)>,
        builtin_functions: impl IntoIterator<Item = Rc<str>>,
        builtin_classes: impl IntoIterator<Item = Rc<str>>,
    ) -> ValueSpace {
        ValueSpace {
            host,
            constants: ConstantRegistry::new(module_constants),
            functions: FunctionRegistry::new(builtin_functions),
            classes: ClassRegistry::new(builtin_classes),
        }
    }

    /// A space with no module-contributed constants/functions/classes,
    /// backed by [`crate::host::DefaultHost`] — the "fresh instance per
    /// test case" shape most unit tests outside this crate's own
    /// modules will want.
    pub fn new_default() -> ValueSpace {
        ValueSpace::new(Rc::new(crate::host::DefaultHost), [], [], [])
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    pub fn constants(&self) -> &ConstantRegistry {
        &self.constants
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    // -- coercion kernel --------------------------------------------

    pub fn as_bool(&self, v: &Value) -> bool {
        coerce::as_bool(v)
    }

    pub fn as_number(&self, v: &Value) -> Number {
        coerce::as_number(v)
    }

    pub fn as_int(&self, v: &Value) -> i64 {
        coerce::as_int(v)
    }

    pub fn as_float(&self, v: &Value) -> f64 {
        coerce::as_float(v)
    }

    pub fn as_string(&self, v: &Value) -> String {
        coerce::as_string(v, self.host())
    }

    pub fn array_to_string_conversion(&self, arr: &PhpArray) -> String {
        coerce::array_to_string_conversion(self.host(), arr)
    }

    pub fn as_array(&self, v: &Value) -> PhpArray {
        coerce::as_array(v)
    }

    pub fn as_object(&self, v: &Value) -> PhpObject {
        coerce::as_object(v, self.host())
    }

    // -- comparator ---------------------------------------------------

    pub fn compare(&self, a: &Value, b: &Value, strict: bool, ignore_order: bool) -> i32 {
        compare::compare(self.host(), a, b, strict, ignore_order)
    }

    pub fn eq(&self, a: &Value, b: &Value) -> bool {
        compare::eq(self.host(), a, b)
    }

    pub fn is_w(&self, a: &Value, b: &Value) -> bool {
        compare::is_w(self.host(), a, b)
    }

    pub fn ne(&self, a: &Value, b: &Value) -> bool {
        compare::ne(self.host(), a, b)
    }

    pub fn lt(&self, a: &Value, b: &Value) -> bool {
        compare::lt(self.host(), a, b)
    }

    pub fn gt(&self, a: &Value, b: &Value) -> bool {
        compare::gt(self.host(), a, b)
    }

    pub fn le(&self, a: &Value, b: &Value) -> bool {
        compare::le(self.host(), a, b)
    }

    pub fn ge(&self, a: &Value, b: &Value) -> bool {
        compare::ge(self.host(), a, b)
    }

    pub fn compare_bounded(
        &self,
        a: &Value,
        b: &Value,
        strict: bool,
        ignore_order: bool,
        max_work_items: usize,
    ) -> Result<i32, crate::error::ValueError> {
        compare::compare_bounded(self.host(), a, b, strict, ignore_order, max_work_items)
    }

    // -- arithmetic ---------------------------------------------------

    pub fn add(&self, a: &Value, b: &Value) -> Value {
        crate::arith::add(self.host(), a, b)
    }

    pub fn sub(&self, a: &Value, b: &Value) -> Value {
        crate::arith::sub(self.host(), a, b)
    }

    pub fn mul(&self, a: &Value, b: &Value) -> Value {
        crate::arith::mul(self.host(), a, b)
    }

    pub fn div(&self, a: &Value, b: &Value) -> Value {
        crate::arith::div(self.host(), a, b)
    }

    pub fn pow(&self, a: &Value, b: &Value) -> Value {
        crate::arith::pow(self.host(), a, b)
    }

    pub fn modulo(&self, a: &Value, b: &Value) -> Value {
        crate::arith::modulo(self.host(), a, b)
    }

    pub fn lshift(&self, a: &Value, b: &Value) -> Value {
        crate::arith::lshift(a, b)
    }

    pub fn rshift(&self, a: &Value, b: &Value) -> Value {
        crate::arith::rshift(a, b)
    }

    pub fn bitand(&self, a: &Value, b: &Value) -> Value {
        crate::arith::bitand(self.host(), a, b)
    }

    pub fn bitor(&self, a: &Value, b: &Value) -> Value {
        crate::arith::bitor(self.host(), a, b)
    }

    pub fn bitxor(&self, a: &Value, b: &Value) -> Value {
        crate::arith::bitxor(self.host(), a, b)
    }

    pub fn uplus(&self, v: &Value) -> Value {
        crate::arith::uplus(v)
    }

    pub fn uminus(&self, v: &Value) -> Value {
        crate::arith::uminus(v)
    }

    pub fn uplusplus(&self, v: &Value) -> Value {
        crate::arith::uplusplus(v)
    }

    pub fn uminusminus(&self, v: &Value) -> Value {
        crate::arith::uminusminus(v)
    }

    // -- array surface --------------------------------------------------

    pub fn getitem(&self, arr: &PhpArray, key: &ArrayKey, give_notice: bool) -> Value {
        crate::array_ops::getitem(self.host(), arr, key, give_notice)
    }

    pub fn setitem(&self, arr: &PhpArray, key: ArrayKey, value: Value) -> PhpArray {
        crate::array_ops::setitem(arr, key, value)
    }

    pub fn setitem_maybe_inplace(&self, arr: &mut PhpArray, key: ArrayKey, value: Value) {
        crate::array_ops::setitem_maybe_inplace(arr, key, value)
    }

    pub fn appenditem_maybe_inplace(&self, arr: &mut PhpArray, value: Value) -> i64 {
        crate::array_ops::appenditem_maybe_inplace(arr, value)
    }

    pub fn packitem_maybe_inplace(&self, arr: &mut PhpArray, key: &ArrayKey, value: Value) {
        crate::array_ops::packitem_maybe_inplace(arr, key, value)
    }

    pub fn slice(
        &self,
        arr: &PhpArray,
        start: i64,
        length: Option<i64>,
        keep_keys: bool,
        keep_str_keys: bool,
    ) -> PhpArray {
        crate::array_ops::slice(arr, start, length, keep_keys, keep_str_keys)
    }

    pub fn iter(&self, arr: &PhpArray) -> crate::array_ops::ArrayIter {
        crate::array_ops::iter(arr)
    }

    pub fn create_iter_ref(&self, v: &Value) -> Option<Vec<(ArrayKey, Reference)>> {
        crate::array_ops::create_iter_ref(self.host(), v)
    }

    // -- coercion (forced-int / helpers) ---------------------------------

    pub fn force_int(&self, v: &Value) -> i64 {
        coerce::force_int(v)
    }

    // -- callback resolution --------------------------------------------

    pub fn resolve_callback(&self, v: &Value) -> Result<BoundInvocable, CallbackError> {
        callback::resolve_callback(self.host(), v)
    }

    pub fn get_callback(&self, fname: &str, arg_no: u32, v: &Value, give_warning: bool) -> BoundInvocable {
        callback::get_callback(self.host(), fname, arg_no, v, give_warning)
    }

    // -- constants --------------------------------------------------

    /// Look up a constant by exact name (case-insensitive only for
    /// `true`/`false`/`null`, per invariant 4).
    pub fn resolve_constant(&self, name: &str) -> Option<Value> {
        self.constants.get(name).cloned()
    }

    // -- resources ----------------------------------------------------

    /// Mint a fresh resource of `kind`, using the host's monotonic
    /// counter.
    pub fn new_resource(&self, kind: ResourceKind, payload: Rc<dyn std::any::Any>) -> Resource {
        let id = self.host.next_resource_id();
        Resource::new(kind, id, payload)
    }

    // -- objects --------------------------------------------------------

    pub fn new_object(&self, class: impl Into<Rc<str>>) -> PhpObject {
        PhpObject::new(class)
    }

    // -- serialization ----------------------------------------------

    pub fn serialize(&self, v: &Value) -> Vec<u8> {
        crate::serialize::serialize(self.host(), v)
    }

    pub fn gettypename(&self, v: &Value) -> String {
        crate::serialize::gettypename(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_default_has_the_fixed_constants_and_no_builtins() {
        let space = ValueSpace::new_default();
        assert_eq!(space.resolve_constant("TRUE"), Some(Value::Bool(true)));
        assert_eq!(space.functions().len(), 0);
        assert_eq!(space.classes().len(), 0);
    }

    #[test]
    fn module_constants_are_merged_in() {
        let space = ValueSpace::new(
            Rc::new(crate::host::DefaultHost),
            [("E_ALL".to_owned(), Value::Int(32767))],
            [],
            [],
        );
        assert_eq!(space.resolve_constant("E_ALL"), Some(Value::Int(32767)));
    }

    #[test]
    fn resource_ids_come_from_the_host_counter() {
        let space = ValueSpace::new_default();
        let a = space.new_resource(ResourceKind::File, Rc::new(()));
        let b = space.new_resource(ResourceKind::File, Rc::new(()));
        assert!(b.id() > a.id());
    }

    #[test]
    fn compare_and_add_forward_to_the_underlying_modules() {
        let space = ValueSpace::new_default();
        assert_eq!(space.compare(&Value::Int(1), &Value::Int(2), false, false), -1);
        assert_eq!(space.add(&Value::Int(1), &Value::Int(2)), Value::Int(3));
    }

    #[test]
    fn array_surface_forwarders_round_trip_through_the_space() {
        let space = ValueSpace::new_default();
        let mut arr = PhpArray::new();
        space.appenditem_maybe_inplace(&mut arr, Value::Int(10));
        space.appenditem_maybe_inplace(&mut arr, Value::Int(20));
        assert_eq!(space.getitem(&arr, &ArrayKey::Int(0), false), Value::Int(10));
        let sliced = space.slice(&arr, -1, None, false, false);
        assert_eq!(space.getitem(&sliced, &ArrayKey::Int(0), false), Value::Int(20));
    }

    #[test]
    fn arithmetic_and_ordering_forwarders_match_the_free_functions() {
        let space = ValueSpace::new_default();
        assert_eq!(space.modulo(&Value::Int(-7), &Value::Int(3)), Value::Int(-1));
        assert_eq!(space.lshift(&Value::Int(1), &Value::Int(4)), Value::Int(16));
        assert!(space.lt(&Value::Int(1), &Value::Int(2)));
        assert!(space.ge(&Value::Int(2), &Value::Int(2)));
    }
}
