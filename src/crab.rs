pub const CRAB: &str = r"
     _~^~^~_        OOB Crab
 \) /  o o  \ (/    DNS + HTTP out-of-band probe
   '_   -   _'
   / '-----' \
";
