// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `ExecutionEngine` implemented on wasmtime.
//!
//! # Sandboxing
//!
//! The engine is created once with:
//! - `consume_fuel(true)`: every store is granted a fixed instruction budget,
//!   reset before each call, so a runaway guest traps with `out_of_fuel`
//! - `epoch_interruption(false)`: no asynchronous interrupts
//! - `max_wasm_stack`: bounded native stack, so unbounded recursion traps
//!   with `stack_exhausted` instead of taking down the host
//! - `wasm_multi_memory(false)`, `wasm_memory64(false)`: one 32-bit memory
//!
//! Each instance owns its own `Store` whose `StoreLimits` cap linear memory
//! growth. Instantiation passes an empty import list; modules with imports
//! fail at that point.

use crate::config::EngineConfig;
use crate::errors::{HostError, HostResult};
use crate::host::trap::TrapKind;
use crate::host::types::{ExportType, FunctionSignature, GlobalSignature, Limits, ValueType};
use crate::host::values::{RawValue, TypedArgument};
use crate::observability::messages::module::EngineCreated;
use crate::traits::engine::{EngineExport, EngineFault, ExecutionEngine};
use wasmtime::{
    Config, Engine, ExternType, Instance, Module, Mutability, Store, StoreLimits,
    StoreLimitsBuilder, Trap, Val, ValType,
};

/// Wasmtime-backed engine shared by every module the host loads.
#[derive(Clone)]
pub struct WasmtimeEngine {
    engine: Engine,
    fuel_per_call: u64,
    max_memory_bytes: usize,
}

/// A live instance together with the store that owns its state.
pub struct WasmtimeInstance {
    store: Store<StoreLimits>,
    instance: Instance,
}

impl WasmtimeInstance {
    /// Fuel left over from the most recent call.
    pub fn remaining_fuel(&self) -> Option<u64> {
        self.store.get_fuel().ok()
    }
}

impl WasmtimeEngine {
    /// Creates the engine, rejecting limits that contradict each other.
    pub fn new(config: &EngineConfig) -> HostResult<Self> {
        config.validate()?;

        let mut wasm_config = Config::new();
        wasm_config.wasm_multi_memory(false);
        wasm_config.wasm_memory64(false);
        wasm_config.consume_fuel(true);
        wasm_config.epoch_interruption(false);
        wasm_config.max_wasm_stack(config.get_max_stack_bytes());

        let engine =
            Engine::new(&wasm_config).map_err(|e| HostError::Engine(e.to_string()))?;

        let fuel_per_call = config.fuel_per_invocation();
        let max_memory_bytes = config.get_max_memory_bytes();

        tracing::info!(
            "{}",
            EngineCreated {
                fuel_level: fuel_per_call,
                max_memory_bytes,
            }
        );

        Ok(Self {
            engine,
            fuel_per_call,
            max_memory_bytes,
        })
    }

    pub fn fuel_per_call(&self) -> u64 {
        self.fuel_per_call
    }

    fn new_store(&self) -> Result<Store<StoreLimits>, EngineFault> {
        let limits = StoreLimitsBuilder::new()
            .memory_size(self.max_memory_bytes)
            .build();
        let mut store = Store::new(&self.engine, limits);
        store.limiter(|limits| limits);
        store
            .set_fuel(self.fuel_per_call)
            .map_err(|e| HostError::Engine(e.to_string()))?;
        Ok(store)
    }
}

impl ExecutionEngine for WasmtimeEngine {
    type Module = Module;
    type Instance = WasmtimeInstance;

    fn compile(&self, bytes: &[u8]) -> Result<Module, HostError> {
        Module::from_binary(&self.engine, bytes).map_err(|e| HostError::Compile(e.to_string()))
    }

    fn list_exports(&self, module: &Module) -> Vec<EngineExport> {
        module
            .exports()
            .map(|export| EngineExport {
                name: export.name().to_string(),
                ty: export_type(export.ty()),
            })
            .collect()
    }

    fn instantiate(&self, module: &Module) -> Result<WasmtimeInstance, EngineFault> {
        let mut store = self.new_store()?;
        let instance = Instance::new(&mut store, module, &[]).map_err(|e| {
            match e.downcast_ref::<Trap>() {
                Some(trap) => EngineFault::Trap(classify_trap(trap)),
                None => EngineFault::Error(HostError::Instantiation(format!("{:#}", e))),
            }
        })?;
        Ok(WasmtimeInstance { store, instance })
    }

    fn call_exported_function(
        &self,
        instance: &mut WasmtimeInstance,
        name: &str,
        args: &[TypedArgument],
    ) -> Result<Vec<RawValue>, EngineFault> {
        let WasmtimeInstance { store, instance } = instance;

        let func = instance
            .get_func(&mut *store, name)
            .ok_or_else(|| HostError::NotFound {
                name: name.to_string(),
            })?;

        // Each call starts from a full budget, whatever the last one used.
        store
            .set_fuel(self.fuel_per_call)
            .map_err(|e| HostError::Engine(e.to_string()))?;

        let result_count = func.ty(&*store).results().len();
        let params: Vec<Val> = args.iter().map(to_val).collect();
        let mut results = vec![Val::I32(0); result_count];

        func.call(&mut *store, &params, &mut results)
            .map_err(|e| match e.downcast_ref::<Trap>() {
                Some(trap) => EngineFault::Trap(classify_trap(trap)),
                None => EngineFault::Error(HostError::Engine(format!("{:#}", e))),
            })?;

        Ok(results.iter().map(from_val).collect())
    }
}

fn classify_trap(trap: &Trap) -> TrapKind {
    match trap {
        Trap::MemoryOutOfBounds | Trap::HeapMisaligned => TrapKind::OutOfBoundsMemoryAccess,
        Trap::IntegerDivisionByZero => TrapKind::IntegerDivisionByZero,
        Trap::IntegerOverflow => TrapKind::IntegerOverflow,
        Trap::UnreachableCodeReached => TrapKind::Unreachable,
        Trap::StackOverflow => TrapKind::StackExhausted,
        Trap::OutOfFuel => TrapKind::OutOfFuel,
        Trap::BadConversionToInteger => TrapKind::InvalidConversion,
        Trap::IndirectCallToNull | Trap::BadSignature => TrapKind::IndirectCallFault,
        Trap::TableOutOfBounds => TrapKind::TableOutOfBounds,
        other => TrapKind::Other(other.to_string()),
    }
}

fn to_val(arg: &TypedArgument) -> Val {
    match *arg {
        TypedArgument::I32(v) => Val::I32(v),
        TypedArgument::I64(v) => Val::I64(v),
        TypedArgument::F32(v) => Val::F32(v.to_bits()),
        TypedArgument::F64(v) => Val::F64(v.to_bits()),
    }
}

fn from_val(val: &Val) -> RawValue {
    match val {
        Val::I32(v) => RawValue::I32(*v),
        Val::I64(v) => RawValue::I64(*v),
        Val::F32(bits) => RawValue::F32(*bits),
        Val::F64(bits) => RawValue::F64(*bits),
        Val::V128(_) => RawValue::Unsupported(ValueType::V128),
        _ => RawValue::Unsupported(ValueType::Ref),
    }
}

fn value_type(ty: &ValType) -> ValueType {
    match ty {
        ValType::I32 => ValueType::I32,
        ValType::I64 => ValueType::I64,
        ValType::F32 => ValueType::F32,
        ValType::F64 => ValueType::F64,
        ValType::V128 => ValueType::V128,
        _ => ValueType::Ref,
    }
}

fn export_type(ty: ExternType) -> ExportType {
    match ty {
        ExternType::Func(func) => ExportType::Function(FunctionSignature::new(
            func.params().map(|t| value_type(&t)).collect(),
            func.results().map(|t| value_type(&t)).collect(),
        )),
        ExternType::Memory(memory) => ExportType::Memory(Limits {
            initial: memory.minimum(),
            maximum: memory.maximum(),
        }),
        ExternType::Table(table) => ExportType::Table(Limits {
            initial: table.minimum().into(),
            maximum: table.maximum().map(Into::into),
        }),
        ExternType::Global(global) => ExportType::Global(GlobalSignature {
            content: value_type(global.content()),
            mutable: global.mutability() == Mutability::Var,
        }),
        _ => ExportType::Tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::test_modules::{importing_module, math_module};

    fn engine() -> WasmtimeEngine {
        WasmtimeEngine::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_engine_uses_configured_fuel() {
        assert_eq!(engine().fuel_per_call(), crate::config::consts::DEFAULT_FUEL_LEVEL);
    }

    #[test]
    fn test_inverted_fuel_bounds_are_config_errors() {
        let config = EngineConfig {
            fuel: crate::config::FuelConfig {
                default: None,
                minimum: Some(10_000_000),
                maximum: Some(1_000_000),
            },
            ..Default::default()
        };
        assert!(matches!(
            WasmtimeEngine::new(&config),
            Err(HostError::Config(_))
        ));
    }

    #[test]
    fn test_oversized_stack_is_config_error() {
        let config = EngineConfig {
            max_stack_bytes: Some(1 << 30),
            ..Default::default()
        };
        match WasmtimeEngine::new(&config) {
            Err(HostError::Config(msg)) => assert!(msg.contains("max_stack_bytes")),
            Err(other) => panic!("Expected Config error, got {:?}", other),
            Ok(_) => panic!("Expected oversized stack to be rejected"),
        }
    }

    #[test]
    fn test_largest_stack_traps_on_blocking_pool_sized_thread() {
        let engine = WasmtimeEngine::new(&EngineConfig {
            max_stack_bytes: Some(crate::config::consts::MAX_STACK_BYTES),
            ..Default::default()
        })
        .unwrap();
        let module = engine.compile(&math_module()).unwrap();

        let outcome = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                let mut instance = engine.instantiate(&module).unwrap();
                match engine.call_exported_function(&mut instance, "recurse", &[]) {
                    Err(EngineFault::Trap(kind)) => kind,
                    other => panic!("Expected a trap, got {:?}", other),
                }
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(outcome, TrapKind::StackExhausted);
    }

    #[test]
    fn test_compile_rejects_garbage() {
        match engine().compile(b"\0asm\x01\0\0\0\x01") {
            Err(HostError::Compile(_)) => {}
            other => panic!("Expected Compile error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_list_exports_in_declaration_order() {
        let engine = engine();
        let module = engine.compile(&math_module()).unwrap();
        let exports = engine.list_exports(&module);

        let names: Vec<&str> = exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(&names[..4], &["memory", "counter", "table", "add"]);
        assert_eq!(
            exports[0].ty,
            ExportType::Memory(Limits {
                initial: 1,
                maximum: Some(2)
            })
        );
        assert_eq!(
            exports[1].ty,
            ExportType::Global(GlobalSignature {
                content: ValueType::I32,
                mutable: true
            })
        );
        assert_eq!(
            exports[3].ty,
            ExportType::Function(FunctionSignature::new(
                vec![ValueType::I32, ValueType::I32],
                vec![ValueType::I32]
            ))
        );
    }

    #[test]
    fn test_call_resets_fuel() {
        let engine = engine();
        let module = engine.compile(&math_module()).unwrap();
        let mut instance = engine.instantiate(&module).unwrap();

        for _ in 0..3 {
            let raw = engine
                .call_exported_function(
                    &mut instance,
                    "add",
                    &[TypedArgument::I32(2), TypedArgument::I32(3)],
                )
                .unwrap();
            assert_eq!(raw, vec![RawValue::I32(5)]);
        }
        let remaining = instance.remaining_fuel().unwrap();
        assert!(remaining > engine.fuel_per_call() - 100);
    }

    #[test]
    fn test_floats_travel_as_bits() {
        let engine = engine();
        let module = engine.compile(&math_module()).unwrap();
        let mut instance = engine.instantiate(&module).unwrap();

        let raw = engine
            .call_exported_function(&mut instance, "identity_f32", &[TypedArgument::F32(1.5)])
            .unwrap();
        assert_eq!(raw, vec![RawValue::F32(1.5f32.to_bits())]);
    }

    #[test]
    fn test_instantiate_with_imports_fails() {
        let engine = engine();
        let module = engine.compile(&importing_module()).unwrap();
        match engine.instantiate(&module) {
            Err(EngineFault::Error(HostError::Instantiation(_))) => {}
            Err(other) => panic!("Expected Instantiation error, got {:?}", other),
            Ok(_) => panic!("Expected instantiation to fail"),
        }
    }

    #[test]
    fn test_classify_trap() {
        assert_eq!(classify_trap(&Trap::OutOfFuel), TrapKind::OutOfFuel);
        assert_eq!(classify_trap(&Trap::StackOverflow), TrapKind::StackExhausted);
        assert_eq!(
            classify_trap(&Trap::BadSignature),
            TrapKind::IndirectCallFault
        );
        assert!(matches!(classify_trap(&Trap::Interrupt), TrapKind::Other(_)));
    }
}
