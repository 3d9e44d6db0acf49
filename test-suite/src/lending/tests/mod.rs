mod funding;
