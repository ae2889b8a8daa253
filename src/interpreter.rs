//! Forthic interpreter - Core execution engine
//!
//! This module provides the main interpreter that executes Forthic code.
//!
//! # Components
//!
//! - **Stack**: Data stack for values
//! - **Interpreter**: Main execution engine with tokenizer integration
//!
//! # Example
//!
//! ```no_run
//! use forthic::interpreter::Interpreter;
//! use forthic::module::Module;
//!
//! let mut interp = Interpreter::new("UTC");
//! // interp.run("42 3.14 'hello'").unwrap();
//! ```

use crate::errors::ForthicError;
use crate::literals::{to_bool, to_float, to_int, to_literal_date, to_time, to_zoned_datetime};
use crate::literals::{ForthicRecord, ForthicValue, LiteralHandler};
use crate::module::{DefinitionWord, InterpreterContext, Module, PushValueWord, Word};
use crate::modules::standard::{
    ArrayModule, BooleanModule, CoreModule, DateTimeModule, FunctionalModule, JSONModule,
    MathModule, RecordModule, StringModule, TSVModule,
};
use crate::tokenizer::{Token, TokenType, Tokenizer};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, trace};

// ========================================
// Special Word Classes
// ========================================

/// StartModuleWord - Handles module creation and switching
///
/// Pushes a module onto the module stack, creating it if necessary.
/// An empty name refers to the app module.
#[derive(Debug, Clone)]
pub struct StartModuleWord {
    name: String,
}

impl StartModuleWord {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

impl Word for StartModuleWord {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        // The app module is the only module with a blank name
        if self.name.is_empty() {
            let app_module = context.get_app_module().clone();
            context.module_stack_push(app_module);
            return Ok(());
        }

        // If the module is used by the current module, push it onto the stack, otherwise
        // create a new module.
        let module = match context.cur_module().find_module(&self.name) {
            Some(m) => m.clone(),
            None => {
                let new_module = Module::new(self.name.clone());
                context
                    .cur_module_mut()
                    .register_module(self.name.clone(), self.name.clone(), new_module.clone());
                new_module
            }
        };
        context.module_stack_push(module);
        Ok(())
    }
}

/// EndModuleWord - Pops the current module from the module stack
///
/// Completes module context and returns to the previous module.
#[derive(Debug, Clone)]
pub struct EndModuleWord;

impl EndModuleWord {
    pub fn new() -> Self {
        Self
    }
}

impl Word for EndModuleWord {
    fn name(&self) -> &str {
        "}"
    }

    fn execute(&self, context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let popped = context.module_stack_pop()?;
        let name = popped.get_name().to_string();

        // Definitions made while a module was the current context must survive
        // past the closing `}`. An empty name is always the app module itself;
        // anything else is written back into the enclosing module's registry
        // under the same name it was opened with.
        if name.is_empty() {
            context.set_app_module(popped);
        } else {
            context.cur_module_mut().register_module(name.clone(), name, popped);
        }

        Ok(())
    }
}

/// EndArrayWord - Collects items from stack into an array
///
/// Pops items from the stack until a START_ARRAY marker is found,
/// then pushes them as a single array in the correct order.
#[derive(Debug, Clone)]
pub struct EndArrayWord;

impl EndArrayWord {
    pub fn new() -> Self {
        Self
    }
}

impl Word for EndArrayWord {
    fn name(&self) -> &str {
        "]"
    }

    fn execute(&self, context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let mut items = Vec::new();

        // Pop items until we find START_ARRAY marker
        loop {
            let item = context.stack_pop()?;
            if matches!(item, ForthicValue::StartArrayMarker) {
                break;
            }
            items.push(item);
        }

        // Reverse to get correct order
        items.reverse();

        // Push as array
        context.stack_push(ForthicValue::Array(items));
        Ok(())
    }
}

// ========================================
// Stack
// ========================================

/// Stack - Data stack for the Forthic interpreter
///
/// Wraps a Vec<ForthicValue> and provides stack operations.
///
/// # Examples
///
/// ```
/// use forthic::interpreter::Stack;
/// use forthic::literals::ForthicValue;
///
/// let mut stack = Stack::new();
/// stack.push(ForthicValue::Int(42));
/// stack.push(ForthicValue::String("hello".to_string()));
///
/// assert_eq!(stack.len(), 2);
/// assert_eq!(stack.pop().unwrap(), ForthicValue::String("hello".to_string()));
/// assert_eq!(stack.pop().unwrap(), ForthicValue::Int(42));
/// assert!(stack.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Stack {
    items: Vec<ForthicValue>,
}

impl Stack {
    /// Create a new empty stack
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: ForthicValue) {
        self.items.push(value);
    }

    /// Pop a value from the stack
    ///
    /// Returns an error if the stack is empty.
    pub fn pop(&mut self) -> Result<ForthicValue, ForthicError> {
        self.items.pop().ok_or_else(|| ForthicError::StackUnderflow {
            forthic: String::new(),
            location: None,
            cause: None,
        })
    }

    /// Peek at the top value without removing it
    pub fn peek(&self) -> Option<&ForthicValue> {
        self.items.last()
    }

    /// Get the number of items on the stack
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clear all items from the stack
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get an item at a specific index (0 is bottom of stack)
    pub fn get(&self, index: usize) -> Option<&ForthicValue> {
        self.items.get(index)
    }

    /// Get a mutable reference to an item at a specific index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ForthicValue> {
        self.items.get_mut(index)
    }

    /// Get a reference to all items
    pub fn items(&self) -> &[ForthicValue] {
        &self.items
    }

    /// Duplicate the stack (shallow copy)
    pub fn dup(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpreter - Main Forthic execution engine
///
/// Manages the data stack, module stack, and execution state.
///
/// # Examples
///
/// ```no_run
/// use forthic::interpreter::Interpreter;
///
/// let mut interp = Interpreter::new("UTC");
/// // Future: interp.run("42 3 +").unwrap();
/// ```
pub struct Interpreter {
    /// Data stack for values
    stack: Stack,

    /// Module stack for nested module contexts. Index 0 is always the
    /// application module (root module with empty name) and is never popped;
    /// it is the single source of truth for `get_app_module`/`get_app_module_mut`.
    module_stack: Vec<Module>,

    /// Tokenizer stack for nested code execution
    tokenizer_stack: Vec<Tokenizer>,

    /// Timezone for date/time operations
    timezone: String,

    /// Whether we're currently compiling a definition
    is_compiling: bool,

    /// Whether the current definition is a memo
    is_memo_definition: bool,

    /// Current definition being compiled
    cur_definition: Option<DefinitionWord>,

    /// Literal handlers for parsing values (checked in registration order)
    literal_handlers: Vec<LiteralHandler>,

    /// Names of screens currently in the middle of being loaded, guards against
    /// a screen (directly or transitively) loading itself.
    screens_being_loaded: std::collections::HashSet<String>,

    /// Whether PROFILE-START/PROFILE-END is currently bracketing execution
    profiling: bool,

    /// Word-call counts accumulated since the last PROFILE-START
    profile_counts: IndexMap<String, u64>,

    /// Per-word elapsed time (nanoseconds) accumulated since the last PROFILE-START
    profile_timings: IndexMap<String, u64>,

    /// Snapshot captured by the most recent PROFILE-END, returned by PROFILE-DATA
    last_profile: Option<ForthicValue>,
}

impl Interpreter {
    /// Create a new interpreter with the specified timezone
    ///
    /// # Arguments
    ///
    /// * `timezone` - Timezone string (e.g., "UTC", "America/Los_Angeles")
    ///
    /// # Examples
    ///
    /// ```
    /// use forthic::interpreter::Interpreter;
    ///
    /// let interp = Interpreter::new("UTC");
    /// ```
    pub fn new(timezone: &str) -> Self {
        let app_module = Module::new(String::new()); // Empty name for app module

        let mut interp = Self {
            stack: Stack::new(),
            module_stack: vec![app_module],
            tokenizer_stack: Vec::new(),
            timezone: timezone.to_string(),
            is_compiling: false,
            is_memo_definition: false,
            cur_definition: None,
            literal_handlers: Vec::new(),
            screens_being_loaded: std::collections::HashSet::new(),
            profiling: false,
            profile_counts: IndexMap::new(),
            profile_timings: IndexMap::new(),
            last_profile: None,
        };

        // Register default literal handlers
        // Order matters: more specific handlers first
        interp.register_literal_handler(Box::new(to_bool)); // TRUE, FALSE
        interp.register_literal_handler(Box::new(to_float)); // 3.14
        interp.register_literal_handler(Box::new(to_zoned_datetime(timezone))); // 2020-06-05T10:15:00Z
        interp.register_literal_handler(Box::new(to_literal_date(timezone))); // 2020-06-05
        interp.register_literal_handler(Box::new(to_time)); // 9:00, 11:30 PM
        interp.register_literal_handler(Box::new(to_int)); // 42

        // The global module is always visible and searched last: every
        // standard module's words are imported unprefixed into the app
        // module up front, so a later `:` definition (or a later import)
        // naturally shadows them via the dictionary's reverse-order search.
        interp.import_modules(vec![
            BooleanModule::new().module().clone(),
            MathModule::new().module().clone(),
            CoreModule::new().module().clone(),
            ArrayModule::new().module().clone(),
            RecordModule::new().module().clone(),
            FunctionalModule::new().module().clone(),
            StringModule::new().module().clone(),
            DateTimeModule::new().module().clone(),
            JSONModule::new().module().clone(),
            TSVModule::new().module().clone(),
        ]);

        interp
    }

    /// Get the timezone
    pub fn get_timezone(&self) -> &str {
        &self.timezone
    }

    /// Set the timezone
    pub fn set_timezone(&mut self, timezone: String) {
        self.timezone = timezone;
    }

    /// Get a reference to the stack
    pub fn get_stack(&self) -> &Stack {
        &self.stack
    }

    /// Get a mutable reference to the stack
    pub fn get_stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Set the entire stack (replacing the current stack)
    pub fn set_stack(&mut self, stack: Stack) {
        self.stack = stack;
    }

    /// Push a value onto the stack
    pub fn stack_push(&mut self, value: ForthicValue) {
        self.stack.push(value);
    }

    /// Pop a value from the stack
    pub fn stack_pop(&mut self) -> Result<ForthicValue, ForthicError> {
        self.stack.pop()
    }

    /// Peek at the top of the stack
    pub fn stack_peek(&self) -> Option<&ForthicValue> {
        self.stack.peek()
    }

    /// Get the current module (top of module stack)
    pub fn cur_module(&self) -> &Module {
        self.module_stack
            .last()
            .expect("Module stack should never be empty")
    }

    /// Get a mutable reference to the current module
    pub fn cur_module_mut(&mut self) -> &mut Module {
        self.module_stack
            .last_mut()
            .expect("Module stack should never be empty")
    }

    /// Push a module onto the module stack
    pub fn module_stack_push(&mut self, module: Module) {
        self.module_stack.push(module);
    }

    /// Pop a module from the module stack
    ///
    /// Returns an error if trying to pop the app module.
    pub fn module_stack_pop(&mut self) -> Result<Module, ForthicError> {
        if self.module_stack.len() <= 1 {
            return Err(ForthicError::StackUnderflow {
                forthic: "Cannot pop app module".to_string(),
                location: None,
                cause: None,
            });
        }
        Ok(self.module_stack.pop().unwrap())
    }

    /// Get the application module
    pub fn get_app_module(&self) -> &Module {
        &self.module_stack[0]
    }

    /// Get a mutable reference to the application module
    pub fn get_app_module_mut(&mut self) -> &mut Module {
        &mut self.module_stack[0]
    }

    /// Check if currently compiling a definition
    pub fn is_compiling(&self) -> bool {
        self.is_compiling
    }

    /// Set compilation state
    pub fn set_compiling(&mut self, compiling: bool) {
        self.is_compiling = compiling;
    }

    /// Check if current definition is a memo
    pub fn is_memo_definition(&self) -> bool {
        self.is_memo_definition
    }

    /// Set memo definition state
    pub fn set_memo_definition(&mut self, is_memo: bool) {
        self.is_memo_definition = is_memo;
    }

    /// Get the current definition being compiled
    pub fn get_cur_definition(&self) -> Option<&DefinitionWord> {
        self.cur_definition.as_ref()
    }

    /// Get a mutable reference to the current definition
    pub fn get_cur_definition_mut(&mut self) -> Option<&mut DefinitionWord> {
        self.cur_definition.as_mut()
    }

    /// Set the current definition
    pub fn set_cur_definition(&mut self, definition: Option<DefinitionWord>) {
        self.cur_definition = definition;
    }

    /// Reset the interpreter state
    ///
    /// Clears the stack and unwinds any open `{module ...}` blocks back to
    /// the app module, but leaves existing definitions in place.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.module_stack.truncate(1);
        self.is_compiling = false;
        self.is_memo_definition = false;
        self.cur_definition = None;
    }

    // ========================================
    // Literal Handlers
    // ========================================

    /// Register a custom literal handler
    ///
    /// Handlers are checked in registration order when parsing words.
    /// More specific handlers should be registered first.
    ///
    /// # Examples
    ///
    /// ```
    /// use forthic::interpreter::Interpreter;
    /// use forthic::literals::ForthicValue;
    ///
    /// let mut interp = Interpreter::new("UTC");
    ///
    /// // Custom handler for hex numbers like 0xFF
    /// fn to_hex(s: &str) -> Option<ForthicValue> {
    ///     if s.starts_with("0x") || s.starts_with("0X") {
    ///         i64::from_str_radix(&s[2..], 16)
    ///             .ok()
    ///             .map(ForthicValue::Int)
    ///     } else {
    ///         None
    ///     }
    /// }
    ///
    /// interp.register_literal_handler(Box::new(to_hex));
    /// ```
    pub fn register_literal_handler(&mut self, handler: LiteralHandler) {
        self.literal_handlers.push(handler);
    }

    /// Unregister a literal handler
    ///
    /// Removes the first matching handler from the list.
    /// Note: Due to boxed closures, comparison is done by raw pointer to the trait object.
    pub fn unregister_literal_handler(&mut self, handler: LiteralHandler) {
        let handler_ptr = &*handler as *const dyn Fn(&str) -> Option<ForthicValue>;
        if let Some(index) = self.literal_handlers.iter().position(|h| {
            let h_ptr = &**h as *const dyn Fn(&str) -> Option<ForthicValue>;
            std::ptr::eq(h_ptr, handler_ptr)
        }) {
            let _ = self.literal_handlers.remove(index);
        }
    }

    /// Try to parse a string as a literal value
    ///
    /// Checks all registered literal handlers in order.
    /// Returns a PushValueWord if successful, None otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use forthic::interpreter::Interpreter;
    ///
    /// let interp = Interpreter::new("UTC");
    ///
    /// // Should recognize integer
    /// assert!(interp.find_literal_word("42").is_some());
    ///
    /// // Should recognize float
    /// assert!(interp.find_literal_word("3.14").is_some());
    ///
    /// // Should recognize boolean
    /// assert!(interp.find_literal_word("TRUE").is_some());
    ///
    /// // Should not recognize unknown word
    /// assert!(interp.find_literal_word("GARBAGE").is_none());
    /// ```
    pub fn find_literal_word(&self, name: &str) -> Option<Arc<dyn Word>> {
        for handler in &self.literal_handlers {
            if let Some(value) = handler(name) {
                return Some(Arc::new(PushValueWord::new(name.to_string(), value)));
            }
        }
        None
    }

    // ========================================
    // Find Word
    // ========================================

    /// Find a word by name
    ///
    /// Searches in this order:
    /// 1. Module stack (from top to bottom) - dictionary words and variables
    /// 2. Literal handlers
    ///
    /// Returns an error if word is not found.
    pub fn find_word(&self, name: &str) -> Result<Arc<dyn Word>, ForthicError> {
        // 1. Check module stack (dictionary words + variables)
        for module in self.module_stack.iter().rev() {
            if let Some(word) = module.find_word(name) {
                return Ok(word);
            }
        }

        // 2. Check literal handlers as fallback
        if let Some(word) = self.find_literal_word(name) {
            return Ok(word);
        }

        // 3. Throw error if still not found
        Err(ForthicError::UnknownWord {
            forthic: String::new(),
            word: name.to_string(),
            location: None,
            cause: None,
        })
    }

    // ========================================
    // Token Handlers
    // ========================================

    /// Main token dispatcher
    ///
    /// Routes tokens to appropriate handlers based on token type.
    pub fn handle_token(&mut self, token: Token) -> Result<(), ForthicError> {
        match token.token_type {
            TokenType::String => self.handle_string_token(token),
            TokenType::Comment => self.handle_comment_token(token),
            TokenType::StartArray => self.handle_start_array_token(token),
            TokenType::EndArray => self.handle_end_array_token(token),
            TokenType::StartModule => self.handle_start_module_token(token),
            TokenType::EndModule => self.handle_end_module_token(token),
            TokenType::StartDef => self.handle_start_definition_token(token),
            TokenType::StartMemo => self.handle_start_memo_token(token),
            TokenType::EndDef => self.handle_end_definition_token(token),
            TokenType::DotSymbol => self.handle_dot_symbol_token(token),
            TokenType::Word => self.handle_word_token(token),
            TokenType::Eos => self.handle_eos_token(token),
        }
    }

    /// Handle string literal tokens
    fn handle_string_token(&mut self, token: Token) -> Result<(), ForthicError> {
        let word = PushValueWord::new(
            "<string>".to_string(),
            ForthicValue::String(token.string.clone()),
        );
        self.handle_word(Arc::new(word))
    }

    /// Handle dot-symbol tokens (.foo)
    fn handle_dot_symbol_token(&mut self, token: Token) -> Result<(), ForthicError> {
        let word = PushValueWord::new(
            "<dot-symbol>".to_string(),
            ForthicValue::String(token.string.clone()),
        );
        self.handle_word(Arc::new(word))
    }

    /// Handle start array tokens [
    fn handle_start_array_token(&mut self, _token: Token) -> Result<(), ForthicError> {
        let word = PushValueWord::new(
            "<start_array_token>".to_string(),
            ForthicValue::StartArrayMarker,
        );
        self.handle_word(Arc::new(word))
    }

    /// Handle end array tokens ]
    fn handle_end_array_token(&mut self, _token: Token) -> Result<(), ForthicError> {
        let word = Arc::new(EndArrayWord::new());
        self.handle_word(word)
    }

    /// Handle start module tokens
    ///
    /// Start/end module tokens are IMMEDIATE words - they execute even during compilation
    /// and are also added to the current definition.
    fn handle_start_module_token(&mut self, token: Token) -> Result<(), ForthicError> {
        let word = Arc::new(StartModuleWord::new(token.string.clone()));

        // If compiling, add to definition
        if self.is_compiling {
            if let Some(def) = &mut self.cur_definition {
                def.add_word(word.clone());
            }
        }

        // Always execute (IMMEDIATE word)
        word.execute(self)
    }

    /// Handle end module tokens }
    fn handle_end_module_token(&mut self, _token: Token) -> Result<(), ForthicError> {
        let word = Arc::new(EndModuleWord::new());

        // If compiling, add to definition
        if self.is_compiling {
            if let Some(def) = &mut self.cur_definition {
                def.add_word(word.clone());
            }
        }

        // Always execute (IMMEDIATE word)
        word.execute(self)
    }

    /// Handle start definition tokens :
    fn handle_start_definition_token(&mut self, token: Token) -> Result<(), ForthicError> {
        if self.is_compiling {
            return Err(ForthicError::MissingSemicolon {
                forthic: String::new(),
                location: None,
                cause: None,
            });
        }

        self.cur_definition = Some(DefinitionWord::new(token.string.clone()));
        self.is_compiling = true;
        self.is_memo_definition = false;
        Ok(())
    }

    /// Handle start memo tokens @:
    fn handle_start_memo_token(&mut self, token: Token) -> Result<(), ForthicError> {
        if self.is_compiling {
            return Err(ForthicError::MissingSemicolon {
                forthic: String::new(),
                location: None,
                cause: None,
            });
        }

        self.cur_definition = Some(DefinitionWord::new(token.string.clone()));
        self.is_compiling = true;
        self.is_memo_definition = true;
        Ok(())
    }

    /// Handle end definition tokens ;
    fn handle_end_definition_token(&mut self, _token: Token) -> Result<(), ForthicError> {
        if !self.is_compiling || self.cur_definition.is_none() {
            return Err(ForthicError::ExtraSemicolon {
                forthic: String::new(),
                location: None,
                cause: None,
            });
        }

        let definition = self.cur_definition.take().unwrap();

        // Add to current module
        if self.is_memo_definition {
            self.cur_module_mut().add_memo_words(Arc::new(definition));
        } else {
            self.cur_module_mut().add_word(Arc::new(definition));
        }

        self.is_compiling = false;
        Ok(())
    }

    /// Handle word tokens (identifiers)
    fn handle_word_token(&mut self, token: Token) -> Result<(), ForthicError> {
        let word = self.find_word(&token.string)?;
        self.handle_word(word)
    }

    /// Handle end-of-stream tokens
    fn handle_eos_token(&mut self, _token: Token) -> Result<(), ForthicError> {
        if self.is_compiling {
            return Err(ForthicError::MissingSemicolon {
                forthic: String::new(),
                location: None,
                cause: None,
            });
        }
        Ok(())
    }

    /// Handle comment tokens (no-op)
    fn handle_comment_token(&mut self, _token: Token) -> Result<(), ForthicError> {
        // Comments are ignored
        Ok(())
    }

    /// Execute or compile a word
    ///
    /// If compiling, adds word to current definition.
    /// Otherwise, executes the word immediately.
    fn handle_word(&mut self, word: Arc<dyn Word>) -> Result<(), ForthicError> {
        if self.is_compiling {
            trace!(word = word.name(), "compiling word into definition");
            if let Some(def) = &mut self.cur_definition {
                def.add_word(word);
            }
            Ok(())
        } else {
            if self.profiling {
                *self.profile_counts.entry(word.name().to_string()).or_insert(0) += 1;
            }
            trace!(word = word.name(), stack_depth = self.stack.len(), "dispatching word");
            let started = self.profiling.then(std::time::Instant::now);
            let result = word.execute(self).map_err(|e| {
                debug!(word = word.name(), error = %e, "word execution failed");
                e
            });
            if let Some(started) = started {
                let elapsed = started.elapsed().as_nanos() as u64;
                *self.profile_timings.entry(word.name().to_string()).or_insert(0) += elapsed;
            }
            result
        }
    }

    // ========================================
    // Profiling
    // ========================================

    fn build_profile_record(&self) -> ForthicValue {
        let mut counts: Vec<(String, u64)> = self
            .profile_counts
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let word_counts: Vec<ForthicValue> = counts
            .into_iter()
            .map(|(word, count)| {
                let mut rec = ForthicRecord::new();
                rec.insert("word".to_string(), ForthicValue::String(word));
                rec.insert("count".to_string(), ForthicValue::Int(count as i64));
                ForthicValue::Record(rec)
            })
            .collect();

        let mut timings = ForthicRecord::new();
        for (word, nanos) in self.profile_timings.iter() {
            timings.insert(word.clone(), ForthicValue::Int(*nanos as i64));
        }

        let mut record = ForthicRecord::new();
        record.insert("word_counts".to_string(), ForthicValue::Array(word_counts));
        record.insert("timings".to_string(), ForthicValue::Record(timings));
        ForthicValue::Record(record)
    }

    // ========================================
    // Execution
    // ========================================

    /// Run Forthic code
    ///
    /// Tokenizes the input string and executes all tokens.
    ///
    /// # Arguments
    ///
    /// * `code` - Forthic code to execute
    ///
    /// # Examples
    ///
    /// ```
    /// use forthic::interpreter::Interpreter;
    ///
    /// let mut interp = Interpreter::new("UTC");
    /// // interp.run("42 3 +").unwrap();
    /// ```
    pub fn run(&mut self, code: &str) -> Result<(), ForthicError> {
        let tokenizer = Tokenizer::new(code.to_string(), None, false);
        self.tokenizer_stack.push(tokenizer);

        let result = self.run_with_tokenizer();

        self.tokenizer_stack.pop();
        result
    }

    /// Execute tokens from the current tokenizer
    ///
    /// Loops through tokens, handling each one until EOS is reached.
    fn run_with_tokenizer(&mut self) -> Result<(), ForthicError> {
        loop {
            // Get the current tokenizer (must exist since run() pushes one)
            let tokenizer = self
                .tokenizer_stack
                .last_mut()
                .expect("Tokenizer stack should not be empty");

            let token = tokenizer.next_token()?;

            // Check for EOS before handling
            if token.token_type == TokenType::Eos {
                self.handle_token(token)?;
                break;
            }

            // Handle the token
            self.handle_token(token)?;
        }

        Ok(())
    }

    // ========================================
    // Tokenizer Access
    // ========================================

    /// Get the current tokenizer (top of tokenizer stack)
    ///
    /// Returns None if the tokenizer stack is empty.
    pub fn get_tokenizer(&self) -> Option<&Tokenizer> {
        self.tokenizer_stack.last()
    }

    /// Get a mutable reference to the current tokenizer
    ///
    /// Returns None if the tokenizer stack is empty.
    pub fn get_tokenizer_mut(&mut self) -> Option<&mut Tokenizer> {
        self.tokenizer_stack.last_mut()
    }

    /// Get the input string from the first (bottom) tokenizer
    ///
    /// This is useful for error messages to show the original code being executed.
    /// Returns an empty string if the tokenizer stack is empty.
    pub fn get_top_input_string(&self) -> String {
        if self.tokenizer_stack.is_empty() {
            return String::new();
        }
        self.tokenizer_stack[0].get_input_string().to_string()
    }

    // ========================================
    // Module Management
    // ========================================

    /// Register a module with the interpreter
    ///
    /// Makes the module available for use by name.
    /// Modules registered this way can be imported into other modules.
    pub fn register_module(&mut self, module: Module) {
        let name = module.get_name().to_string();
        self.get_app_module_mut()
            .register_module(name.clone(), name, module);
    }

    /// Find a registered module by name
    ///
    /// Returns an error if the module is not found.
    pub fn find_module(&self, name: &str) -> Result<&Module, ForthicError> {
        self.get_app_module()
            .find_module(name)
            .ok_or_else(|| ForthicError::UnknownModule {
                forthic: String::new(),
                module_name: name.to_string(),
                location: None,
                cause: None,
            })
    }

    /// Import a module into the app module with optional prefix
    ///
    /// Convenience method that registers and imports a module in one step.
    ///
    /// # Arguments
    ///
    /// * `module` - The module to import
    /// * `prefix` - Optional prefix for the imported words (empty string for no prefix)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use forthic::interpreter::Interpreter;
    /// use forthic::module::Module;
    ///
    /// let mut interp = Interpreter::new("UTC");
    /// let module = Module::new("math".to_string());
    ///
    /// // Import without prefix
    /// interp.import_module(module.clone(), "");
    ///
    /// // Import with prefix
    /// interp.import_module(module, "m");
    /// ```
    pub fn import_module(&mut self, module: Module, prefix: &str) {
        debug!(module = module.get_name(), prefix, "importing module");

        // Register the module first
        self.register_module(module.clone());

        // Import into app module
        self.get_app_module_mut().import_module(prefix, &module);
    }

    /// Import multiple modules without prefixes
    ///
    /// Convenience method for importing several modules at once.
    pub fn import_modules(&mut self, modules: Vec<Module>) {
        for module in modules {
            self.import_module(module, "");
        }
    }

    // ========================================
    // Module Execution
    // ========================================

    /// Execute a module's Forthic code
    ///
    /// Pushes the module onto the module stack, runs its code, then pops it.
    /// Wraps any errors in a ModuleError for better diagnostics.
    ///
    /// # Arguments
    ///
    /// * `module` - The module to execute
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use forthic::interpreter::Interpreter;
    /// use forthic::module::Module;
    ///
    /// let mut interp = Interpreter::new("UTC");
    /// let module = Module::new_with_code("test".to_string(), ": HELLO 'world' ;".to_string());
    /// interp.run_module_code(&module).unwrap();
    /// ```
    pub fn run_module_code(&mut self, module: &Module) -> Result<(), ForthicError> {
        self.module_stack_push(module.clone());

        // Try to run the module's code
        let result = self.run(&module.get_forthic_code());

        // Always pop the module, even if there was an error
        self.module_stack_pop()?;

        // If there was an error, wrap it in a Module error
        if let Err(e) = result {
            let inner_message = e.to_string();
            return Err(ForthicError::Module {
                forthic: String::new(),
                module_name: module.get_name().to_string(),
                inner_message,
                inner_error: Box::new(e),
                location: None,
                cause: None,
            });
        }

        Ok(())
    }
}

// ========================================
// InterpreterContext Implementation
// ========================================

impl InterpreterContext for Interpreter {
    fn stack_push(&mut self, value: ForthicValue) {
        self.stack.push(value);
    }

    fn stack_pop(&mut self) -> Result<ForthicValue, ForthicError> {
        self.stack.pop()
    }

    fn stack_peek(&self) -> Option<&ForthicValue> {
        self.stack.peek()
    }

    fn cur_module(&self) -> &Module {
        self.module_stack
            .last()
            .expect("Module stack should never be empty")
    }

    fn cur_module_mut(&mut self) -> &mut Module {
        self.module_stack
            .last_mut()
            .expect("Module stack should never be empty")
    }

    fn get_app_module(&self) -> &Module {
        &self.module_stack[0]
    }

    fn module_stack_push(&mut self, module: Module) {
        self.module_stack.push(module);
    }

    fn module_stack_pop(&mut self) -> Result<Module, ForthicError> {
        if self.module_stack.len() <= 1 {
            return Err(ForthicError::StackUnderflow {
                forthic: "Cannot pop app module".to_string(),
                location: None,
                cause: None,
            });
        }
        Ok(self.module_stack.pop().unwrap())
    }

    fn profile_start(&mut self) {
        self.profiling = true;
        self.profile_counts.clear();
        self.profile_timings.clear();
    }

    fn profile_end(&mut self) -> ForthicValue {
        self.profiling = false;
        let snapshot = self.build_profile_record();
        self.last_profile = Some(snapshot.clone());
        snapshot
    }

    fn profile_data(&self) -> ForthicValue {
        self.last_profile.clone().unwrap_or_else(|| {
            let mut record = ForthicRecord::new();
            record.insert("word_counts".to_string(), ForthicValue::Array(Vec::new()));
            record.insert("timings".to_string(), ForthicValue::Record(ForthicRecord::new()));
            ForthicValue::Record(record)
        })
    }

    fn interpret(&mut self, code: &str) -> Result<(), ForthicError> {
        self.run(code)
    }

    fn timezone(&self) -> String {
        self.timezone.clone()
    }

    fn begin_screen_load(&mut self, name: &str) -> Result<(), ForthicError> {
        if !self.screens_being_loaded.insert(name.to_string()) {
            debug!(screen = name, "screen recursion detected");
            return Err(ForthicError::ScreenRecursion {
                forthic: String::new(),
                screen_name: name.to_string(),
                location: None,
                cause: None,
            });
        }
        debug!(screen = name, "loading screen");
        Ok(())
    }

    fn end_screen_load(&mut self, name: &str) {
        trace!(screen = name, "finished loading screen");
        self.screens_being_loaded.remove(name);
    }

    fn set_app_module(&mut self, module: Module) {
        self.module_stack[0] = module;
    }
}
