// tests/integration/fixtures.rs

//! Shared endpoint URLs and bean contents used across integration tests.

use beangate::core::provider::MemoryEndpoint;
use beangate::core::value::Value;

pub mod constants {
    pub const APP_URL: &str = "service:jmx:rmi:///jndi/rmi://app01:9010/jmxrmi";
    pub const OTHER_URL: &str = "service:jmx:rmi:///jndi/rmi://app02:9010/jmxrmi";
    pub const DOWN_URL: &str = "service:jmx:rmi:///jndi/rmi://down:9010/jmxrmi";

    pub const MEMORY_BEAN: &str = "java.lang:type=Memory";
    pub const THREADING_BEAN: &str = "java.lang:type=Threading";
    pub const RUNTIME_BEAN: &str = "java.lang:type=Runtime";
}

/// Populates an endpoint with a small JVM-like set of beans.
pub fn populate_jvm(endpoint: &MemoryEndpoint) {
    use constants::*;

    endpoint.set_attribute(
        MEMORY_BEAN,
        "HeapMemoryUsage",
        Value::record([
            ("committed", Value::from(2048)),
            ("init", Value::from(512)),
            ("max", Value::from(4096)),
            ("used", Value::from(1024)),
        ]),
    );
    endpoint.set_attribute(MEMORY_BEAN, "ObjectPendingFinalizationCount", 0);
    endpoint.set_attribute(THREADING_BEAN, "ThreadCount", 17);
    endpoint.set_attribute(THREADING_BEAN, "PeakThreadCount", 23);
    endpoint.set_attribute(
        RUNTIME_BEAN,
        "SystemProperties",
        Value::mapping([
            ("java.version", Value::from("21.0.2")),
            ("user.timezone", Value::from("UTC")),
        ]),
    );
    endpoint.set_attribute(
        RUNTIME_BEAN,
        "InputArguments",
        Value::sequence([Value::from("-Xmx4g"), Value::from("-XX:+UseG1GC")]),
    );
    endpoint.set_attribute(RUNTIME_BEAN, "BootClassPath", Value::Null);
    endpoint.set_attribute(RUNTIME_BEAN, "VmName", "OpenJDK 64-Bit Server VM\nbuild 21");
}
