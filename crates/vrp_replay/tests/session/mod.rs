mod hand_off_tests;
