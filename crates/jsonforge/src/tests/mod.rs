mod fixtures;

mod property_roundtrip;
