mod service_attr_tests;
