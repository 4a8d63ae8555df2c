use std::io::Cursor;

use rowvalue::{
    DescriptorFactory, EngineConfig, LogicalType, RawValue, StorageType, TypeDescriptor, Value,
};

#[allow(dead_code)]
pub fn factory() -> DescriptorFactory {
    DescriptorFactory::new(EngineConfig::default())
}

#[allow(dead_code)]
pub fn descriptor(logical_type: LogicalType) -> TypeDescriptor {
    factory().create("col", logical_type)
}

#[allow(dead_code)]
pub fn sized(logical_type: LogicalType, length: i32, precision: i32) -> TypeDescriptor {
    factory().create_with_length("col", logical_type, length, precision)
}

#[allow(dead_code)]
pub fn masked(logical_type: LogicalType, mask: &str) -> TypeDescriptor {
    let mut meta = descriptor(logical_type);
    meta.set_conversion_mask(Some(mask.to_string()));
    meta
}

/// Binary-string column whose stored text follows `storage_mask`.
#[allow(dead_code)]
pub fn lazy(logical_type: LogicalType, mask: Option<&str>, storage_mask: Option<&str>) -> TypeDescriptor {
    let mut meta = descriptor(logical_type);
    meta.set_conversion_mask(mask.map(str::to_string));
    meta.use_binary_string_storage();

    let mut storage = meta.storage_metadata().cloned().unwrap();
    storage.set_conversion_mask(storage_mask.map(str::to_string));
    meta.set_storage_metadata(Some(storage)).unwrap();
    meta
}

#[allow(dead_code)]
pub fn indexed(logical_type: LogicalType, entries: Vec<Option<Value>>) -> TypeDescriptor {
    let mut meta = descriptor(logical_type);
    meta.set_storage_type(StorageType::Indexed);
    meta.set_index(Some(entries)).unwrap();
    meta
}

#[allow(dead_code)]
pub fn binary_roundtrip(meta: &TypeDescriptor, raw: &RawValue) -> RawValue {
    let mut buf = Vec::new();
    meta.write_data(&mut buf, raw).unwrap();
    meta.read_data(&mut Cursor::new(buf)).unwrap()
}

#[allow(dead_code)]
pub fn meta_roundtrip(meta: &TypeDescriptor) -> TypeDescriptor {
    let mut buf = Vec::new();
    meta.write_meta(&mut buf).unwrap();
    factory().read_meta(&mut Cursor::new(buf)).unwrap()
}

#[allow(dead_code)]
pub fn xml_roundtrip(meta: &TypeDescriptor, raw: &RawValue) -> RawValue {
    let xml = meta.data_to_xml(raw).unwrap();
    meta.data_from_xml(&xml).unwrap()
}
