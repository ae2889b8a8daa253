// Functional module for Forthic
//
// Higher-order collection operations: transforming, filtering, reducing, and
// reordering arrays and records by running a quoted Forthic body per element.
//
// ## Categories
// - Mapping: MAP, MAP-w/KEY, FOREACH, FOREACH-w/KEY, FOREACH>ERRORS
// - Filtering/reducing: SELECT, SELECT-w/KEY, ZIP-WITH, REDUCE
// - Grouping: BY-FIELD, GROUP-BY-FIELD, GROUP-BY, GROUP-BY-w/KEY, GROUPS-OF
// - Reordering: ROTATE, ROTATE-ELEMENT, SHUFFLE, SORT, SORT-w/FORTHIC,
//   SORT-w/KEY-FUNC, FIELD-KEY-FUNC
// - Lookup: KEY-OF

use crate::errors::ForthicError;
use crate::literals::{ForthicRecord, ForthicValue, WordRef};
use crate::module::{InterpreterContext, Module, ModuleWord};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::cmp::Ordering;
use std::sync::Arc;

/// FunctionalModule provides higher-order collection operations
pub struct FunctionalModule {
    module: Module,
}

impl FunctionalModule {
    /// Create a new FunctionalModule
    pub fn new() -> Self {
        let mut module = Module::new("functional".to_string());

        Self::register_mapping_words(&mut module);
        Self::register_filter_reduce_words(&mut module);
        Self::register_grouping_words(&mut module);
        Self::register_reorder_words(&mut module);
        Self::register_lookup_words(&mut module);

        Self { module }
    }

    /// Get the underlying module
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Get a mutable reference to the underlying module
    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    // ===== Mapping Operations =====

    fn register_mapping_words(module: &mut Module) {
        let word = Arc::new(ModuleWord::new("MAP".to_string(), Self::word_map));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("MAP-w/KEY".to_string(), Self::word_map_w_key));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("FOREACH".to_string(), Self::word_foreach));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("FOREACH-w/KEY".to_string(), Self::word_foreach_w_key));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new(
            "FOREACH>ERRORS".to_string(),
            Self::word_foreach_to_errors,
        ));
        module.add_exportable_word(word);
    }

    /// Pop the quoted body off the stack, leaving the container beneath it.
    /// Mirrors `<REPEAT`'s handling of a non-string body: stack is restored
    /// unchanged and the word becomes a no-op.
    fn pop_body(context: &mut dyn InterpreterContext) -> Result<Option<(ForthicValue, String)>, ForthicError> {
        let body_val = context.stack_pop()?;
        let container = context.stack_pop()?;

        match body_val {
            ForthicValue::String(body) => Ok(Some((container, body))),
            other => {
                context.stack_push(container);
                context.stack_push(other);
                Ok(None)
            }
        }
    }

    fn word_map(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        let result = match container {
            ForthicValue::Array(arr) => {
                let mut mapped = Vec::with_capacity(arr.len());
                for elem in arr {
                    context.stack_push(elem);
                    context.interpret(&body)?;
                    mapped.push(context.stack_pop()?);
                }
                ForthicValue::Array(mapped)
            }
            ForthicValue::Record(rec) => {
                let mut mapped = ForthicRecord::new();
                for (key, value) in rec {
                    context.stack_push(value);
                    context.interpret(&body)?;
                    mapped.insert(key, context.stack_pop()?);
                }
                ForthicValue::Record(mapped)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_map_w_key(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        let result = match container {
            ForthicValue::Array(arr) => {
                let mut mapped = Vec::with_capacity(arr.len());
                for (idx, elem) in arr.into_iter().enumerate() {
                    context.stack_push(ForthicValue::Int(idx as i64));
                    context.stack_push(elem);
                    context.interpret(&body)?;
                    mapped.push(context.stack_pop()?);
                }
                ForthicValue::Array(mapped)
            }
            ForthicValue::Record(rec) => {
                let mut mapped = ForthicRecord::new();
                for (key, value) in rec {
                    Self::push_record_key(context, &key);
                    context.stack_push(value);
                    context.interpret(&body)?;
                    mapped.insert(key, context.stack_pop()?);
                }
                ForthicValue::Record(mapped)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    /// The accumulator already sits beneath the container on the stack; the
    /// body is responsible for consuming and re-pushing it, so this word
    /// only has to interpret the body once per element.
    fn word_foreach(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        for elem in Self::extract_values(container) {
            context.stack_push(elem);
            context.interpret(&body)?;
        }

        Ok(())
    }

    fn word_foreach_w_key(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        match container {
            ForthicValue::Array(arr) => {
                for (idx, elem) in arr.into_iter().enumerate() {
                    context.stack_push(ForthicValue::Int(idx as i64));
                    context.stack_push(elem);
                    context.interpret(&body)?;
                }
            }
            ForthicValue::Record(rec) => {
                for (key, value) in rec {
                    Self::push_record_key(context, &key);
                    context.stack_push(value);
                    context.interpret(&body)?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Interprets `body` against each element, collecting a parallel array of
    /// per-element errors (null on success) instead of aborting the run.
    /// Whatever the body's side effects leave on the stack (the "successful
    /// accumulations") stays put beneath the errors array this word pushes.
    fn word_foreach_to_errors(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        let mut errors = Vec::new();
        for elem in Self::extract_values(container) {
            context.stack_push(elem);
            match context.interpret(&body) {
                Ok(()) => errors.push(ForthicValue::Null),
                Err(e) => errors.push(ForthicValue::String(e.to_string())),
            }
        }

        context.stack_push(ForthicValue::Array(errors));
        Ok(())
    }

    // ===== Filter / Reduce Operations =====

    fn register_filter_reduce_words(module: &mut Module) {
        let word = Arc::new(ModuleWord::new("SELECT".to_string(), Self::word_select));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("SELECT-w/KEY".to_string(), Self::word_select_w_key));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("ZIP-WITH".to_string(), Self::word_zip_with));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("REDUCE".to_string(), Self::word_reduce));
        module.add_exportable_word(word);
    }

    fn word_select(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        let result = match container {
            ForthicValue::Array(arr) => {
                let mut kept = Vec::new();
                for elem in arr {
                    context.stack_push(elem.clone());
                    context.interpret(&body)?;
                    if Self::is_truthy(&context.stack_pop()?) {
                        kept.push(elem);
                    }
                }
                ForthicValue::Array(kept)
            }
            ForthicValue::Record(rec) => {
                let mut kept = ForthicRecord::new();
                for (key, value) in rec {
                    context.stack_push(value.clone());
                    context.interpret(&body)?;
                    if Self::is_truthy(&context.stack_pop()?) {
                        kept.insert(key, value);
                    }
                }
                ForthicValue::Record(kept)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_select_w_key(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        let result = match container {
            ForthicValue::Array(arr) => {
                let mut kept = Vec::new();
                for (idx, elem) in arr.into_iter().enumerate() {
                    context.stack_push(ForthicValue::Int(idx as i64));
                    context.stack_push(elem.clone());
                    context.interpret(&body)?;
                    if Self::is_truthy(&context.stack_pop()?) {
                        kept.push(elem);
                    }
                }
                ForthicValue::Array(kept)
            }
            ForthicValue::Record(rec) => {
                let mut kept = ForthicRecord::new();
                for (key, value) in rec {
                    Self::push_record_key(context, &key);
                    context.stack_push(value.clone());
                    context.interpret(&body)?;
                    if Self::is_truthy(&context.stack_pop()?) {
                        kept.insert(key, value);
                    }
                }
                ForthicValue::Record(kept)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_zip_with(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (right, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };
        let left = context.stack_pop()?;

        let result = match (left, right) {
            (ForthicValue::Array(l), ForthicValue::Array(r)) => {
                let len = l.len().min(r.len());
                let mut zipped = Vec::with_capacity(len);
                for i in 0..len {
                    context.stack_push(l[i].clone());
                    context.stack_push(r[i].clone());
                    context.interpret(&body)?;
                    zipped.push(context.stack_pop()?);
                }
                ForthicValue::Array(zipped)
            }
            (ForthicValue::Record(l), ForthicValue::Record(r)) => {
                let mut zipped = ForthicRecord::new();
                for (key, lvalue) in l {
                    if let Some(rvalue) = r.get(&key) {
                        context.stack_push(lvalue);
                        context.stack_push(rvalue.clone());
                        context.interpret(&body)?;
                        zipped.insert(key, context.stack_pop()?);
                    }
                }
                ForthicValue::Record(zipped)
            }
            _ => ForthicValue::Array(vec![]),
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_reduce(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let body_val = context.stack_pop()?;
        let init = context.stack_pop()?;
        let container = context.stack_pop()?;

        let body = match body_val {
            ForthicValue::String(s) => s,
            other => {
                context.stack_push(container);
                context.stack_push(init);
                context.stack_push(other);
                return Ok(());
            }
        };

        let mut acc = init;
        for elem in Self::extract_values(container) {
            context.stack_push(acc);
            context.stack_push(elem);
            context.interpret(&body)?;
            acc = context.stack_pop()?;
        }

        context.stack_push(acc);
        Ok(())
    }

    // ===== Grouping Operations =====

    fn register_grouping_words(module: &mut Module) {
        let word = Arc::new(ModuleWord::new("BY-FIELD".to_string(), Self::word_by_field));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new(
            "GROUP-BY-FIELD".to_string(),
            Self::word_group_by_field,
        ));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("GROUP-BY".to_string(), Self::word_group_by));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new(
            "GROUP-BY-w/KEY".to_string(),
            Self::word_group_by_w_key,
        ));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("GROUPS-OF".to_string(), Self::word_groups_of));
        module.add_exportable_word(word);
    }

    fn word_by_field(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let field_val = context.stack_pop()?;
        let container = context.stack_pop()?;

        let field = match field_val {
            ForthicValue::String(s) => s,
            _ => {
                context.stack_push(container);
                return Ok(());
            }
        };

        let mut result = ForthicRecord::new();
        for elem in Self::extract_values(container) {
            if let ForthicValue::Record(ref rec) = elem {
                if let Some(field_value) = rec.get(&field) {
                    result.insert(Self::key_string(field_value), elem.clone());
                }
            }
        }

        context.stack_push(ForthicValue::Record(result));
        Ok(())
    }

    fn word_group_by_field(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let field_val = context.stack_pop()?;
        let container = context.stack_pop()?;

        let field = match field_val {
            ForthicValue::String(s) => s,
            _ => {
                context.stack_push(container);
                return Ok(());
            }
        };

        let mut result = ForthicRecord::new();
        for elem in Self::extract_values(container) {
            if let ForthicValue::Record(ref rec) = elem {
                if let Some(field_value) = rec.get(&field) {
                    let key = Self::key_string(field_value);
                    Self::append_group(&mut result, key, elem.clone());
                }
            }
        }

        context.stack_push(ForthicValue::Record(result));
        Ok(())
    }

    fn word_group_by(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        let mut result = ForthicRecord::new();
        for elem in Self::extract_values(container) {
            context.stack_push(elem.clone());
            context.interpret(&body)?;
            let key_val = context.stack_pop()?;
            let key = Self::key_string(&key_val);
            Self::append_group(&mut result, key, elem);
        }

        context.stack_push(ForthicValue::Record(result));
        Ok(())
    }

    fn word_group_by_w_key(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        let mut result = ForthicRecord::new();
        match container {
            ForthicValue::Array(arr) => {
                for (idx, elem) in arr.into_iter().enumerate() {
                    context.stack_push(ForthicValue::Int(idx as i64));
                    context.stack_push(elem.clone());
                    context.interpret(&body)?;
                    let key_val = context.stack_pop()?;
                    Self::append_group(&mut result, Self::key_string(&key_val), elem);
                }
            }
            ForthicValue::Record(rec) => {
                for (k, v) in rec {
                    Self::push_record_key(context, &k);
                    context.stack_push(v.clone());
                    context.interpret(&body)?;
                    let key_val = context.stack_pop()?;
                    Self::append_group(&mut result, Self::key_string(&key_val), v);
                }
            }
            _ => {}
        }

        context.stack_push(ForthicValue::Record(result));
        Ok(())
    }

    fn word_groups_of(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let n_val = context.stack_pop()?;
        let container = context.stack_pop()?;

        let n = match n_val {
            ForthicValue::Int(i) if i > 0 => i as usize,
            ForthicValue::Float(f) if f > 0.0 => f as usize,
            _ => {
                context.stack_push(container);
                return Ok(());
            }
        };

        let result = match container {
            ForthicValue::Array(arr) => {
                let groups: Vec<ForthicValue> = arr
                    .chunks(n)
                    .map(|chunk| ForthicValue::Array(chunk.to_vec()))
                    .collect();
                ForthicValue::Array(groups)
            }
            ForthicValue::Record(rec) => {
                let entries: Vec<(String, ForthicValue)> = rec.into_iter().collect();
                let groups: Vec<ForthicValue> = entries
                    .chunks(n)
                    .map(|chunk| {
                        let mut group = ForthicRecord::new();
                        for (i, (_, value)) in chunk.iter().enumerate() {
                            group.insert(i.to_string(), value.clone());
                        }
                        ForthicValue::Record(group)
                    })
                    .collect();
                ForthicValue::Array(groups)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Reorder Operations =====

    fn register_reorder_words(module: &mut Module) {
        let word = Arc::new(ModuleWord::new("ROTATE".to_string(), Self::word_rotate));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new(
            "ROTATE-ELEMENT".to_string(),
            Self::word_rotate_element,
        ));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("SHUFFLE".to_string(), Self::word_shuffle));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new("SORT".to_string(), Self::word_sort));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new(
            "SORT-w/FORTHIC".to_string(),
            Self::word_sort_w_forthic,
        ));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new(
            "SORT-w/KEY-FUNC".to_string(),
            Self::word_sort_w_key_func,
        ));
        module.add_exportable_word(word);

        let word = Arc::new(ModuleWord::new(
            "FIELD-KEY-FUNC".to_string(),
            Self::word_field_key_func,
        ));
        module.add_exportable_word(word);
    }

    fn word_rotate(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let container = context.stack_pop()?;

        let result = match container {
            ForthicValue::Array(mut arr) => {
                if let Some(last) = arr.pop() {
                    arr.insert(0, last);
                }
                ForthicValue::Array(arr)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_rotate_element(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let needle = context.stack_pop()?;
        let container = context.stack_pop()?;

        let result = match container {
            ForthicValue::Array(mut arr) => {
                if let Some(idx) = arr.iter().position(|v| Self::values_equal(v, &needle)) {
                    let item = arr.remove(idx);
                    arr.insert(0, item);
                }
                ForthicValue::Array(arr)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_shuffle(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let container = context.stack_pop()?;

        let result = match container {
            ForthicValue::Array(mut arr) => {
                arr.shuffle(&mut thread_rng());
                ForthicValue::Array(arr)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_sort(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let container = context.stack_pop()?;

        let result = match container {
            ForthicValue::Array(mut arr) => {
                arr.sort_by(Self::compare_values);
                ForthicValue::Array(arr)
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_sort_w_forthic(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let (container, body) = match Self::pop_body(context)? {
            Some(pair) => pair,
            None => return Ok(()),
        };

        let result = match container {
            ForthicValue::Array(arr) => {
                let mut keyed = Vec::with_capacity(arr.len());
                for elem in arr {
                    context.stack_push(elem.clone());
                    context.interpret(&body)?;
                    let key = context.stack_pop()?;
                    keyed.push((key, elem));
                }
                keyed.sort_by(|a, b| Self::compare_values(&a.0, &b.0));
                ForthicValue::Array(keyed.into_iter().map(|(_, v)| v).collect())
            }
            other => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_sort_w_key_func(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let key_func_val = context.stack_pop()?;
        let container = context.stack_pop()?;

        let result = match (container, key_func_val) {
            (ForthicValue::Array(arr), ForthicValue::Word(word_ref)) => {
                let mut keyed = Vec::with_capacity(arr.len());
                for elem in arr {
                    context.stack_push(elem.clone());
                    word_ref.call(context)?;
                    let key = context.stack_pop()?;
                    keyed.push((key, elem));
                }
                keyed.sort_by(|a, b| Self::compare_values(&a.0, &b.0));
                ForthicValue::Array(keyed.into_iter().map(|(_, v)| v).collect())
            }
            (other, _) => other,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_field_key_func(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let field_val = context.stack_pop()?;

        match field_val {
            ForthicValue::String(field) => {
                let word_ref = WordRef::new(format!("FIELD-KEY-FUNC({})", field), move |ctx| {
                    let value = ctx.stack_pop()?;
                    let field_value = match value {
                        ForthicValue::Record(rec) => rec.get(&field).cloned().unwrap_or(ForthicValue::Null),
                        _ => ForthicValue::Null,
                    };
                    ctx.stack_push(field_value);
                    Ok(())
                });
                context.stack_push(ForthicValue::Word(word_ref));
            }
            other => context.stack_push(other),
        }

        Ok(())
    }

    // ===== Lookup Operations =====

    fn register_lookup_words(module: &mut Module) {
        let word = Arc::new(ModuleWord::new("KEY-OF".to_string(), Self::word_key_of));
        module.add_exportable_word(word);
    }

    fn word_key_of(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let needle = context.stack_pop()?;
        let container = context.stack_pop()?;

        let result = match container {
            ForthicValue::Array(arr) => arr
                .iter()
                .position(|v| Self::values_equal(v, &needle))
                .map(|i| ForthicValue::Int(i as i64))
                .unwrap_or(ForthicValue::Null),
            ForthicValue::Record(rec) => rec
                .iter()
                .find(|(_, v)| Self::values_equal(v, &needle))
                .map(|(k, _)| ForthicValue::String(k.clone()))
                .unwrap_or(ForthicValue::Null),
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Helper Functions =====

    /// Array elements in order, or a record's values in insertion order.
    fn extract_values(container: ForthicValue) -> Vec<ForthicValue> {
        match container {
            ForthicValue::Array(arr) => arr,
            ForthicValue::Record(rec) => rec.into_values().collect(),
            _ => vec![],
        }
    }

    fn append_group(result: &mut ForthicRecord, key: String, elem: ForthicValue) {
        match result.get_mut(&key) {
            Some(ForthicValue::Array(arr)) => arr.push(elem),
            _ => {
                result.insert(key, ForthicValue::Array(vec![elem]));
            }
        }
    }

    /// Stringify a value for use as a group/BY-FIELD record key. Record keys
    /// are always strings in this implementation, so a numeric field value
    /// becomes its decimal rendering.
    fn key_string(val: &ForthicValue) -> String {
        match val {
            ForthicValue::String(s) => s.clone(),
            ForthicValue::Int(i) => i.to_string(),
            ForthicValue::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            ForthicValue::Bool(b) => b.to_string(),
            other => other.dedup_key(),
        }
    }

    /// Push a record's (string) key back onto the stack, recovering its
    /// original numeric type when it looks numeric. Needed so bodies like
    /// `key @ 2 *` work on records whose keys came from numeric field values.
    fn push_record_key(context: &mut dyn InterpreterContext, key: &str) {
        if let Ok(i) = key.parse::<i64>() {
            context.stack_push(ForthicValue::Int(i));
        } else if let Ok(f) = key.parse::<f64>() {
            context.stack_push(ForthicValue::Float(f));
        } else {
            context.stack_push(ForthicValue::String(key.to_string()));
        }
    }

    fn is_truthy(val: &ForthicValue) -> bool {
        match val {
            ForthicValue::Null => false,
            ForthicValue::Bool(b) => *b,
            ForthicValue::Int(i) => *i != 0,
            ForthicValue::Float(f) => *f != 0.0,
            ForthicValue::String(s) => !s.is_empty(),
            ForthicValue::Array(a) => !a.is_empty(),
            _ => true,
        }
    }

    fn values_equal(a: &ForthicValue, b: &ForthicValue) -> bool {
        a.dedup_key() == b.dedup_key()
    }

    fn compare_values(a: &ForthicValue, b: &ForthicValue) -> Ordering {
        match (a, b) {
            (ForthicValue::Int(x), ForthicValue::Int(y)) => x.cmp(y),
            (ForthicValue::Float(x), ForthicValue::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
            (ForthicValue::Int(x), ForthicValue::Float(y)) => {
                (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal)
            }
            (ForthicValue::Float(x), ForthicValue::Int(y)) => {
                x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal)
            }
            (ForthicValue::String(x), ForthicValue::String(y)) => x.cmp(y),
            _ => Ordering::Equal,
        }
    }
}

impl Default for FunctionalModule {
    fn default() -> Self {
        Self::new()
    }
}
